use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::core::client::deployments::K8sError;
use crate::domain::manage::errors::ManageError;

/// Generic text returned for failures whose details stay in the logs.
pub const UNEXPECTED_ERROR_DETAIL: &str = "internal failure while handling request";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Kubernetes API Error: {0}")]
    K8sApiError(String),

    #[error("Unexpected Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::K8sApiError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ManageError> for AppError {
    fn from(err: ManageError) -> Self {
        match err {
            ManageError::Validation(msg) => AppError::BadRequest(msg),
            err @ ManageError::NoContainers { .. } => AppError::BadRequest(err.to_string()),
            ManageError::Cluster(K8sError::Api { reason, message, .. }) => {
                AppError::K8sApiError(format!("{reason}: {message}"))
            }
            // Cause is logged by the caller, never echoed to the client
            ManageError::Cluster(K8sError::Transport(_)) => {
                AppError::InternalServerError(UNEXPECTED_ERROR_DETAIL.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // String provided by thiserror → safe JSON message
        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}
