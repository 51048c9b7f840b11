use std::sync::Arc;

use crate::captcha::TokenVerifier;
use crate::config::Config;
use crate::email::MailTransport;
use crate::rate_limit::RateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    /// None when no captcha secret is configured; submissions then skip
    /// token verification entirely.
    pub verifier: Option<Arc<dyn TokenVerifier>>,
    pub mailer: Arc<dyn MailTransport>,
    pub limiter: RateLimiter,
}
