use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::core::client::deployments::{DeploymentClient, DeploymentRef};
use crate::core::client::kube_resources::Deployment;
use crate::domain::manage::dto::manage_request::ManageCommand;
use crate::domain::manage::dto::operation_result::OperationResult;
use crate::domain::manage::errors::ManageError;
use crate::domain::manage::service::patches::{
    memory_limit_patch, restart_patch, restart_timestamp,
};

/// Runs exactly one cluster operation per validated command.
///
/// Holds no state besides the shared cluster client; concurrent requests against the
/// same Deployment race at the API server and the last write wins.
#[derive(Clone)]
pub struct ManageService {
    client: Arc<dyn DeploymentClient>,
}

impl ManageService {
    pub fn new(client: Arc<dyn DeploymentClient>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, command: ManageCommand) -> Result<OperationResult, ManageError> {
        debug!("Executing '{}' on {}", command.action(), command.target());

        match command {
            ManageCommand::Scale { target, replicas } => self.scale(&target, replicas).await,
            ManageCommand::Restart { target } => self.restart(&target).await,
            ManageCommand::Status { target } => self.status(&target).await,
            ManageCommand::UpdateResources {
                target,
                memory_limit,
            } => self.update_resources(&target, &memory_limit).await,
        }
    }

    async fn scale(
        &self,
        target: &DeploymentRef,
        replicas: i32,
    ) -> Result<OperationResult, ManageError> {
        self.client.patch_deployment_scale(target, replicas).await?;

        info!("Scaled {} to {} replica(s)", target, replicas);
        Ok(OperationResult::success(format!(
            "Horizontal scaling applied: '{}' set to {} replicas.",
            target.name, replicas
        )))
    }

    async fn restart(&self, target: &DeploymentRef) -> Result<OperationResult, ManageError> {
        let timestamp = restart_timestamp(Utc::now());
        self.client
            .patch_deployment(target, &restart_patch(&timestamp))
            .await?;

        info!("Triggered rollout restart of {} at {}", target, timestamp);
        Ok(OperationResult::success(format!(
            "Rollout restart triggered for '{}' at {}.",
            target.name, timestamp
        )))
    }

    /// Read-then-patch; not atomic. A spec change landing between the two calls may be
    /// overwritten for the targeted container's memory limit.
    async fn update_resources(
        &self,
        target: &DeploymentRef,
        memory_limit: &str,
    ) -> Result<OperationResult, ManageError> {
        let deployment = self.client.read_deployment(target).await?;
        let container = primary_container_name(&deployment).ok_or_else(|| {
            ManageError::NoContainers {
                deployment: target.to_string(),
            }
        })?;

        self.client
            .patch_deployment(target, &memory_limit_patch(container, memory_limit))
            .await?;

        info!(
            "Set memory limit of container '{}' in {} to {}",
            container, target, memory_limit
        );
        Ok(OperationResult::success(format!(
            "Vertical scaling applied: '{}' memory limit updated to {}.",
            target.name, memory_limit
        )))
    }

    async fn status(&self, target: &DeploymentRef) -> Result<OperationResult, ManageError> {
        let deployment = self.client.read_deployment(target).await?;
        let (ready, total) = replica_summary(&deployment);

        debug!("Deployment {} has {}/{} pods ready", target, ready, total);
        Ok(OperationResult::success(format!(
            "Status: {ready}/{total} pods ready."
        )))
    }
}

/// Name of the first container in the pod template; the bridge assumes single-container pods.
pub fn primary_container_name(deployment: &Deployment) -> Option<&str> {
    deployment
        .spec
        .as_ref()?
        .template
        .spec
        .as_ref()?
        .containers
        .first()
        .map(|c| c.name.as_str())
}

/// `(availableReplicas, replicas)` from the Deployment status, each defaulting to 0.
pub fn replica_summary(deployment: &Deployment) -> (i32, i32) {
    deployment
        .status
        .as_ref()
        .map(|s| (s.available_replicas.unwrap_or(0), s.replicas.unwrap_or(0)))
        .unwrap_or((0, 0))
}
