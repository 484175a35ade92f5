use std::sync::Arc;

use crate::config::ApiToken;
use crate::core::client::deployments::DeploymentClient;
use crate::domain::manage::service::manage_service::ManageService;

/// Shared by every request; the cluster client inside is the only long-lived connection.
#[derive(Clone)]
pub struct AppState {
    pub manage_service: Arc<ManageService>,
    pub api_token: Arc<ApiToken>,
}

pub fn build_app_state(client: Arc<dyn DeploymentClient>, api_token: ApiToken) -> AppState {
    AppState {
        manage_service: Arc::new(ManageService::new(client)),
        api_token: Arc::new(api_token),
    }
}
