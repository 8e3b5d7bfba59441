use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value as JsonValue;

use contact_records::value::is_truthy;
use contact_types::api::InsertResponse;
use contact_types::models::{RawInput, RecordKind};

use crate::AppState;
use crate::error::{ApiError, record_failure};

/// POST /api/contact: verify the reCAPTCHA token, then store the message.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let token = match body.get("token") {
        Some(JsonValue::String(t)) if !t.is_empty() => t.clone(),
        // Any other truthy value is passed on as its JSON text
        Some(t) if is_truthy(Some(t)) => t.to_string(),
        _ => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "no reCAPTCHA token provided",
            ));
        }
    };

    if !state.recaptcha.verify(&token).await {
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "reCAPTCHA verification failed",
        ));
    }

    let outcome = state
        .dispatcher
        .insert_record(RecordKind::Message.name(), body)
        .await
        .map_err(|e| record_failure("/api/contact", e))?;

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            message: "message sent".into(),
            id: outcome.insert_id,
        }),
    ))
}
