use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::CaptchaConfig;

/// Outcome reported by the verification provider for a single token.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub success: bool,
    pub score: Option<f64>,
}

/// Seam over the external bot-check provider so the pipeline can be tested
/// without network access.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Verdict, String>;
}

/// reCAPTCHA-style verifier: one POST with the shared secret and the
/// client-supplied token, JSON response with a success flag and an
/// optional confidence score.
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl RecaptchaVerifier {
    pub fn new(config: &CaptchaConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build reqwest client"),
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
        }
    }
}

#[derive(Deserialize)]
struct SiteverifyResponse {
    success: bool,
    score: Option<f64>,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

#[async_trait]
impl TokenVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str) -> Result<Verdict, String> {
        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| format!("Verification request failed: {e}"))?;

        let body: SiteverifyResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid verification response: {e}"))?;

        if !body.success && !body.error_codes.is_empty() {
            tracing::debug!("Provider rejected token: {:?}", body.error_codes);
        }

        Ok(Verdict {
            success: body.success,
            score: body.score,
        })
    }
}
