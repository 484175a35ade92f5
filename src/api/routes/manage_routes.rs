//! Management routes (e.g., /manage)

use axum::{routing::post, Router};

use crate::api::controller::manage::ManageController;
use crate::app_state::AppState;

pub fn manage_routes() -> Router<AppState> {
    Router::new().route("/manage", post(ManageController::manage))
}
