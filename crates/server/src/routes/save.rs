use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use pipegallery::SaveEnvelope;
use serde_json::json;
use std::sync::Arc;

/// Forward one save envelope to the configured endpoint.
///
/// Exactly one upstream request is made; a rejected or failed request is
/// reported back so the page can re-enable its button.
///
/// # Example
/// ```json
/// // Request
/// { "web_query": { "data": "{\"title\":\"Sunset\",\"url_max\":\"...\"}" } }
/// // Response
/// { "saved": true }
/// ```
pub async fn save_record(
    State(state): State<Arc<ServerState>>,
    Json(envelope): Json<SaveEnvelope>,
) -> ServerResult<impl IntoResponse> {
    if let Err(err) = state.saver.save(&envelope).await {
        tracing::error!(error = %err, "Save request failed");
        return Err(err.into());
    }

    Ok(Json(json!({ "saved": true })))
}
