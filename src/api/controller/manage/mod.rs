//! Management controller: authenticates, validates and dispatches `POST /manage`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::api::auth::authorize;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::manage::dto::manage_request::ManageRequest;
use crate::domain::manage::dto::operation_result::OperationResult;
use crate::errors::AppError;

pub struct ManageController;

impl ManageController {
    pub async fn manage(
        State(state): State<AppState>,
        headers: HeaderMap,
        payload: Result<Json<ManageRequest>, JsonRejection>,
    ) -> Result<Json<OperationResult>, AppError> {
        // Authenticate before looking at the body
        authorize(&headers, &state.api_token)?;

        let Json(request) = payload.map_err(|rejection| {
            AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
        })?;

        let command = match request.into_command() {
            Ok(command) => command,
            Err(err) => return to_json(Err(err)),
        };

        to_json(state.manage_service.execute(command).await)
    }
}
