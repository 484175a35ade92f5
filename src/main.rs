use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use manage_bridge::app_state::build_app_state;
use manage_bridge::config::AppConfig;
use manage_bridge::core::client::deployments::KubeDeploymentClient;
use manage_bridge::core::client::kube_client::{build_kube_client, verify_connection};
use manage_bridge::logging::init_tracing;
use manage_bridge::startup::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let _log_guard = init_tracing(config.log_dir.as_deref())?;

    // Refuse to serve anything without a reachable, authenticated cluster
    let client = match build_kube_client(&config.kube).await {
        Ok(client) => client,
        Err(e) => {
            error!("Could not load Kubernetes config: {:#}", e);
            return Err(e);
        }
    };
    if let Err(e) = verify_connection(&client).await {
        error!("Could not reach the Kubernetes API server: {:#}", e);
        return Err(e);
    }
    info!("Connected to Kubernetes ({:?} credentials)", config.kube.mode);

    let state = build_app_state(
        Arc::new(KubeDeploymentClient::new(client)),
        config.api_token.clone(),
    );

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;

    run(listener, state).await
}
