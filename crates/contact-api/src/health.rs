use axum::{Json, response::IntoResponse};

use contact_types::api::HealthResponse;

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}
