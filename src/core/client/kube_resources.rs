/// Re-export the Kubernetes resource types the bridge reads and patches

pub use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStatus};

pub use k8s_openapi::api::core::v1::{Container as K8sContainer, PodSpec, PodTemplateSpec};
