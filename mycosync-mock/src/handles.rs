use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mycosync_api::models::{CommandResponse, ControlCommand, SettingsUpdate};
use serde_json::json;

use crate::state::MockState;

fn failure_response(status: StatusCode) -> Response {
    (status, Json(json!({ "error": status.canonical_reason().unwrap_or("error") }))).into_response()
}

pub async fn get_data(State(state): State<MockState>) -> Response {
    if let Some(status) = state.failure().await {
        return failure_response(status);
    }

    Json(state.snapshot().await).into_response()
}

pub async fn post_control(
    State(state): State<MockState>,
    Json(command): Json<ControlCommand>,
) -> Response {
    if let Some(status) = state.failure().await {
        return failure_response(status);
    }

    tracing::debug!("Receive control: {command}");
    state.apply_command(&command).await;

    Json(CommandResponse {
        success: true,
        message: "Control updated".to_string(),
    })
    .into_response()
}

pub async fn post_settings(
    State(state): State<MockState>,
    Json(update): Json<SettingsUpdate>,
) -> Response {
    if let Some(status) = state.failure().await {
        return failure_response(status);
    }

    tracing::debug!("Receive settings: {:?}", update);
    state.apply_thresholds(&update.thresholds).await;

    Json(CommandResponse {
        success: true,
        message: "Settings updated".to_string(),
    })
    .into_response()
}
