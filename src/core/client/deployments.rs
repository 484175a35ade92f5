use std::fmt;

use async_trait::async_trait;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::core::client::kube_resources::Deployment;

/// Errors emitted by the Deployment adapter.
#[derive(Debug, Error)]
pub enum K8sError {
    /// The API server answered with a failure status (not found, conflict, forbidden, ...).
    #[error("{reason}: {message}")]
    Api {
        code: u16,
        reason: String,
        message: String,
    },
    /// Anything else the kube client reports: transport, TLS, auth plugin, decoding.
    #[error("{0}")]
    Transport(String),
}

impl From<kube::Error> for K8sError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(status) => K8sError::Api {
                code: status.code,
                reason: status.reason.clone(),
                message: status.message.clone(),
            },
            other => K8sError::Transport(other.to_string()),
        }
    }
}

/// Identifies one Deployment in the cluster. Nothing about it is cached locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRef {
    pub name: String,
    pub namespace: String,
}

impl DeploymentRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for DeploymentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Typed read/patch operations on Deployments.
///
/// Every call is a single remote round trip. Failures are returned as-is and never retried.
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    /// Reads the current Deployment object.
    async fn read_deployment(&self, target: &DeploymentRef) -> Result<Deployment, K8sError>;

    /// Applies a strategic merge patch to the Deployment.
    async fn patch_deployment(&self, target: &DeploymentRef, patch: &Value)
        -> Result<(), K8sError>;

    /// Sets the desired replica count through the `scale` subresource.
    async fn patch_deployment_scale(
        &self,
        target: &DeploymentRef,
        replicas: i32,
    ) -> Result<(), K8sError>;
}

/// Body sent to the `scale` subresource; only `spec.replicas` is present.
pub fn scale_patch(replicas: i32) -> Value {
    json!({ "spec": { "replicas": replicas } })
}

/// [`DeploymentClient`] backed by a live kube [`Client`].
#[derive(Clone)]
pub struct KubeDeploymentClient {
    client: Client,
}

impl KubeDeploymentClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl DeploymentClient for KubeDeploymentClient {
    async fn read_deployment(&self, target: &DeploymentRef) -> Result<Deployment, K8sError> {
        let deployment = self.api(&target.namespace).get(&target.name).await?;

        debug!("Fetched deployment: {}", target);
        Ok(deployment)
    }

    async fn patch_deployment(
        &self,
        target: &DeploymentRef,
        patch: &Value,
    ) -> Result<(), K8sError> {
        self.api(&target.namespace)
            .patch(&target.name, &PatchParams::default(), &Patch::Strategic(patch))
            .await?;

        debug!("Patched deployment: {}", target);
        Ok(())
    }

    async fn patch_deployment_scale(
        &self,
        target: &DeploymentRef,
        replicas: i32,
    ) -> Result<(), K8sError> {
        let patch = scale_patch(replicas);
        self.api(&target.namespace)
            .patch_scale(&target.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        debug!("Scaled deployment {} to {} replica(s)", target, replicas);
        Ok(())
    }
}
