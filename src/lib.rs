pub mod captcha;
pub mod config;
pub mod email;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::captcha::TokenVerifier;
use crate::config::Config;
use crate::email::MailTransport;
use crate::middleware::cors::enforce_origin;
use crate::rate_limit::RateLimiter;
use crate::state::{AppState, SharedState};

pub fn build_app(
    config: Config,
    verifier: Option<Arc<dyn TokenVerifier>>,
    mailer: Arc<dyn MailTransport>,
) -> (Router, SharedState) {
    if verifier.is_some() {
        tracing::info!("Token verification enabled");
    } else {
        tracing::warn!("Token verification disabled; submissions are relayed unverified");
    }

    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        verifier,
        mailer,
        limiter: RateLimiter::new(),
    });

    let app = Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            enforce_origin,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                )),
        )
        .with_state(state.clone());

    (app, state)
}
