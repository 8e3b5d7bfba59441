use serde::{Deserialize, Serialize};

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Unix time in milliseconds.
    pub timestamp: i64,
}

// -- Inserts --

/// Returned with `201 Created` by every insert endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertResponse {
    pub message: String,
    pub id: i64,
}

// -- reCAPTCHA --

/// Body of Google's `siteverify` answer. Only the fields we act on.
#[derive(Debug, Deserialize)]
pub struct SiteVerifyResponse {
    pub success: bool,
    /// Present for v3 tokens only.
    pub score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}
