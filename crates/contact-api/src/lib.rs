pub mod contact;
pub mod error;
pub mod health;
pub mod insert;
pub mod recaptcha;
pub mod register;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use contact_records::Dispatcher;

use crate::recaptcha::RecaptchaVerifier;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub dispatcher: Dispatcher,
    pub recaptcha: RecaptchaVerifier,
}

/// All API routes. CORS and tracing layers are added by the server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/register", post(register::register))
        .route("/api/insert/{table}", post(insert::insert_into_table))
        .with_state(state)
}
