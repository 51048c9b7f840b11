use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::rate_limit;
use crate::state::SharedState;
use crate::submission::{pipeline, Submission};

pub async fn send_email(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let submission: Submission = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid JSON body: {e}")))?;

    let client_ip =
        rate_limit::client_ip(&headers, Some(addr.ip()), &state.config.trusted_proxies);

    let result = pipeline::run(&state, client_ip, submission).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Email sent successfully",
            "receipt": result.receipt,
        })),
    )
        .into_response())
}

/// Cross-origin preflight. The origin allow-list itself is enforced by the
/// middleware layer; this only advertises what the endpoint accepts.
pub async fn send_email_options() -> Response {
    (
        [
            ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
            ("Access-Control-Max-Age", "86400"),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}
