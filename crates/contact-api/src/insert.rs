use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use contact_types::api::InsertResponse;
use contact_types::models::{RawInput, RecordKind};

use crate::AppState;
use crate::error::{ApiError, record_failure};

/// POST /api/insert/{table}: generic insert, limited to the known tables.
pub async fn insert_into_table(
    State(state): State<AppState>,
    Path(table): Path<String>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = RecordKind::ALL
        .into_iter()
        .find(|kind| kind.table() == table)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "table not allowed"))?;
    let Json(body) = payload?;

    let route = format!("/api/insert/{}", table);
    let outcome = state
        .dispatcher
        .insert_record(kind.name(), body)
        .await
        .map_err(|e| record_failure(&route, e))?;

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            message: format!("inserted into {}", table),
            id: outcome.insert_id,
        }),
    ))
}
