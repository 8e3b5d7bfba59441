use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use contact_records::RecordError;
use contact_types::api::ErrorResponse;

/// A failed request: status code plus the message sent back as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unreadable bodies (wrong content type, bad JSON, not an object) are
/// client errors and answer with the usual JSON error body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        let status = match &err {
            RecordError::Config(_) => StatusCode::NOT_FOUND,
            RecordError::Validation(_) => StatusCode::BAD_REQUEST,
            RecordError::Storage { conflict: true, .. } => StatusCode::CONFLICT,
            RecordError::Storage { .. } | RecordError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Convert a pipeline failure for `route` and log it.
pub fn record_failure(route: &str, err: RecordError) -> ApiError {
    let api = ApiError::from(err);
    if api.status.is_server_error() {
        error!("Error in {}: {}", route, api.message);
    } else {
        warn!("Rejected request to {}: {}", route, api.message);
    }
    api
}
