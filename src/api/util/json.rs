use axum::Json;
use tracing::{error, warn};

use crate::domain::manage::errors::ManageError;
use crate::errors::AppError;

/// Map a domain result into a JSON body, or into the [`AppError`] carrying its status code.
///
/// This is the one place a failed request gets logged.
pub fn to_json<T: serde::Serialize>(result: Result<T, ManageError>) -> Result<Json<T>, AppError> {
    match result {
        Ok(value) => Ok(Json(value)),
        Err(err) => {
            match &err {
                ManageError::Cluster(cause) => error!("Cluster operation failed: {}", cause),
                other => warn!("Request rejected: {}", other),
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::deployments::K8sError;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn transport_failure_is_logged_once() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            to_json::<()>(Err(ManageError::Cluster(K8sError::Transport(
                "connection refused".into(),
            ))))
        });

        assert!(matches!(result, Err(AppError::InternalServerError(_))));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("connection refused").count(), 1, "{output}");
    }
}
