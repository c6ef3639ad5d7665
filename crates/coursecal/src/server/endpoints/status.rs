use axum::{response::IntoResponse, Json};
use serde_json::json;

/// GET /
pub async fn get_home() -> &'static str {
    "Hi"
}

/// GET /health
pub async fn get_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
