use axum::{Json, extract::State};

use crate::dtos::StatusResponse;
use crate::startup::AppState;

/// Report whether the relay can reach its upstream. Always answers 200 with
/// a status string so the client can poll it without special error handling.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let model = state.completion.model().to_string();

    if !state.completion.is_configured() {
        return Json(StatusResponse {
            configured: false,
            status: "unconfigured",
            model,
            error: None,
        });
    }

    match state.completion.list_models().await {
        Ok(()) => Json(StatusResponse {
            configured: true,
            status: "ready",
            model,
            error: None,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "Upstream status probe failed");
            Json(StatusResponse {
                configured: true,
                status: "error",
                model,
                error: Some(err.to_string()),
            })
        }
    }
}
