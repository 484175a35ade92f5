use std::sync::Mutex;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStatus};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use manage_bridge::core::client::deployments::{DeploymentClient, DeploymentRef, K8sError};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Read(DeploymentRef),
    Patch(DeploymentRef, Value),
    Scale(DeploymentRef, i32),
}

#[derive(Debug, Clone)]
pub enum Failure {
    Api { code: u16, reason: String, message: String },
    Transport(String),
}

impl Failure {
    fn to_error(&self) -> K8sError {
        match self {
            Failure::Api {
                code,
                reason,
                message,
            } => K8sError::Api {
                code: *code,
                reason: reason.clone(),
                message: message.clone(),
            },
            Failure::Transport(detail) => K8sError::Transport(detail.clone()),
        }
    }
}

/// Fake cluster adapter that records every call it receives.
#[derive(Default)]
pub struct RecordingDeploymentClient {
    deployment: Deployment,
    failure: Option<Failure>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingDeploymentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployment = deployment;
        self
    }

    pub fn failing_with(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) -> Result<(), K8sError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeploymentClient for RecordingDeploymentClient {
    async fn read_deployment(&self, target: &DeploymentRef) -> Result<Deployment, K8sError> {
        self.record(RecordedCall::Read(target.clone()))?;
        Ok(self.deployment.clone())
    }

    async fn patch_deployment(&self, target: &DeploymentRef, patch: &Value) -> Result<(), K8sError> {
        self.record(RecordedCall::Patch(target.clone(), patch.clone()))
    }

    async fn patch_deployment_scale(
        &self,
        target: &DeploymentRef,
        replicas: i32,
    ) -> Result<(), K8sError> {
        self.record(RecordedCall::Scale(target.clone(), replicas))
    }
}

pub fn deployment(containers: &[&str], available: Option<i32>, replicas: Option<i32>) -> Deployment {
    Deployment {
        spec: Some(DeploymentSpec {
            template: PodTemplateSpec {
                spec: Some(PodSpec {
                    containers: containers
                        .iter()
                        .map(|name| Container {
                            name: name.to_string(),
                            ..Container::default()
                        })
                        .collect(),
                    ..PodSpec::default()
                }),
                ..PodTemplateSpec::default()
            },
            ..DeploymentSpec::default()
        }),
        status: Some(DeploymentStatus {
            available_replicas: available,
            replicas,
            ..DeploymentStatus::default()
        }),
        ..Deployment::default()
    }
}
