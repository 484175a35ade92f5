use thiserror::Error;

use crate::core::client::deployments::K8sError;

#[derive(Debug, Error)]
pub enum ManageError {
    /// The request is structurally or semantically invalid; nothing was sent to the cluster.
    #[error("{0}")]
    Validation(String),

    #[error("Deployment '{deployment}' has no containers to update")]
    NoContainers { deployment: String },

    #[error(transparent)]
    Cluster(#[from] K8sError),
}
