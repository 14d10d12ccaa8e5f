use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests"),
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}
