use anyhow::{Context, Result};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::{debug, info};

use crate::config::{KubeMode, KubeSettings};

/// Creates a Kubernetes client from the configured credential source
pub async fn build_kube_client(settings: &KubeSettings) -> Result<Client> {
    let config = match settings.mode {
        KubeMode::Kubeconfig => {
            debug!(
                "Using local kubeconfig (context: {})",
                settings.context.as_deref().unwrap_or("<current>")
            );
            let options = KubeConfigOptions {
                context: settings.context.clone(),
                ..KubeConfigOptions::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .context("failed to load kubeconfig")?
        }
        KubeMode::InCluster => {
            // Reads the mounted service account token and CA bundle
            debug!("Using in-cluster configuration");
            Config::incluster().context("failed to load in-cluster configuration")?
        }
        KubeMode::Infer => {
            debug!("Inferring Kubernetes configuration from the environment");
            Config::infer()
                .await
                .context("failed to infer Kubernetes configuration")?
        }
    };

    let client = Client::try_from(config).context("failed to build Kubernetes client")?;
    debug!("Kubernetes client initialized successfully");
    Ok(client)
}

/// Issues one round trip to the API server so unreachable or unauthenticated
/// clusters fail at startup instead of on the first request.
pub async fn verify_connection(client: &Client) -> Result<()> {
    let version = client
        .apiserver_version()
        .await
        .context("Kubernetes API server is unreachable")?;

    info!(
        "Connected to Kubernetes API server {} ({})",
        version.git_version, version.platform
    );
    Ok(())
}
