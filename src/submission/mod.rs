pub mod pipeline;
pub mod validate;

use serde::Deserialize;

/// A single contact-form submission. Exists only for the lifetime of the
/// request; never persisted, retried, or deduplicated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    /// Opaque bot-check token. `recaptchaToken` is the legacy wire name.
    #[serde(default, alias = "recaptchaToken")]
    pub verification_token: Option<String>,
}
