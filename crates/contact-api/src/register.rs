use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use contact_records::validate::is_email;
use contact_records::value::is_truthy;
use contact_types::api::InsertResponse;
use contact_types::models::{RawInput, RecordKind};

use crate::AppState;
use crate::error::{ApiError, record_failure};

/// POST /api/register: create a user unless the email is already taken.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    if !["email", "name", "password"]
        .iter()
        .all(|field| is_truthy(body.get(*field)))
    {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "missing required fields",
        ));
    }

    let email = body
        .get("email")
        .and_then(|e| e.as_str())
        .filter(|e| is_email(e))
        .map(str::to_owned)
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "invalid email"))?;

    // Lookup is blocking; keep it off the async runtime
    let db = state.dispatcher.db().clone();
    let existing = tokio::task::spawn_blocking(move || db.get_user_by_email(&email))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        })?
        .map_err(|e| {
            error!("Error in /api/register: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    if existing.is_some() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "email already registered",
        ));
    }

    // A concurrent registration can still win the race; the UNIQUE
    // constraint turns that into a 409 as well.
    let outcome = state
        .dispatcher
        .insert_record(RecordKind::User.name(), body)
        .await
        .map_err(|e| record_failure("/api/register", e))?;

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            message: "user created".into(),
            id: outcome.insert_id,
        }),
    ))
}
