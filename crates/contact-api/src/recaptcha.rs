use anyhow::Result;
use tracing::{error, warn};

use contact_types::api::SiteVerifyResponse;

pub const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Checks reCAPTCHA tokens (v2 or v3) against Google's `siteverify` endpoint.
///
/// Without a configured secret every token is rejected.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret: Option<String>,
    threshold: f64,
    endpoint: String,
}

impl RecaptchaVerifier {
    pub fn new(secret: Option<String>, threshold: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret: secret.filter(|s| !s.is_empty()),
            threshold,
            endpoint: SITEVERIFY_URL.to_string(),
        }
    }

    /// Point the verifier at another `siteverify`-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn verify(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        let Some(secret) = self.secret.as_deref() else {
            warn!("RECAPTCHA_SECRET_KEY is not set, rejecting token");
            return false;
        };

        match self.siteverify(secret, token).await {
            Ok(resp) => {
                if !resp.success && !resp.error_codes.is_empty() {
                    warn!("reCAPTCHA rejected token: {}", resp.error_codes.join(", "));
                }
                passes(&resp, self.threshold)
            }
            Err(e) => {
                error!("reCAPTCHA verification request failed: {}", e);
                false
            }
        }
    }

    async fn siteverify(&self, secret: &str, token: &str) -> Result<SiteVerifyResponse> {
        let body = self
            .client
            .post(&self.endpoint)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}

/// v2 answers carry no score and pass on `success` alone.
pub fn passes(resp: &SiteVerifyResponse, threshold: f64) -> bool {
    resp.success && resp.score.is_none_or(|score| score >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Form, Json, Router, routing::post};
    use serde::Deserialize;
    use serde_json::json;

    fn answer(success: bool, score: Option<f64>) -> SiteVerifyResponse {
        SiteVerifyResponse {
            success,
            score,
            error_codes: vec![],
        }
    }

    #[test]
    fn score_must_reach_threshold() {
        assert!(passes(&answer(true, None), 0.5));
        assert!(passes(&answer(true, Some(0.5)), 0.5));
        assert!(!passes(&answer(true, Some(0.3)), 0.5));
        assert!(!passes(&answer(false, Some(0.9)), 0.5));
        assert!(!passes(&answer(false, None), 0.5));
    }

    #[tokio::test]
    async fn missing_secret_or_token_rejects_without_a_request() {
        let verifier = RecaptchaVerifier::new(None, DEFAULT_THRESHOLD)
            .with_endpoint("http://127.0.0.1:1/unreachable");
        assert!(!verifier.verify("token").await);

        let verifier = RecaptchaVerifier::new(Some("secret".into()), DEFAULT_THRESHOLD)
            .with_endpoint("http://127.0.0.1:1/unreachable");
        assert!(!verifier.verify("").await);
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_closed() {
        let verifier = RecaptchaVerifier::new(Some("secret".into()), DEFAULT_THRESHOLD)
            .with_endpoint("http://127.0.0.1:1/unreachable");
        assert!(!verifier.verify("token").await);
    }

    #[derive(Deserialize)]
    struct VerifyForm {
        secret: String,
        response: String,
    }

    /// Local stand-in for `siteverify`: scores the token "human" high, anything else low.
    async fn fake_siteverify(Form(form): Form<VerifyForm>) -> Json<serde_json::Value> {
        if form.secret != "s3cret" {
            return Json(json!({ "success": false, "error-codes": ["invalid-input-secret"] }));
        }
        let score = if form.response == "human" { 0.9 } else { 0.1 };
        Json(json!({ "success": true, "score": score }))
    }

    async fn spawn_fake() -> String {
        let app = Router::new().route("/siteverify", post(fake_siteverify));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/siteverify", addr)
    }

    #[tokio::test]
    async fn posts_secret_and_token_and_applies_score() {
        let endpoint = spawn_fake().await;

        let verifier =
            RecaptchaVerifier::new(Some("s3cret".into()), DEFAULT_THRESHOLD).with_endpoint(&endpoint);
        assert!(verifier.verify("human").await);
        assert!(!verifier.verify("bot").await);

        let wrong_secret =
            RecaptchaVerifier::new(Some("other".into()), DEFAULT_THRESHOLD).with_endpoint(&endpoint);
        assert!(!wrong_secret.verify("human").await);
    }
}
