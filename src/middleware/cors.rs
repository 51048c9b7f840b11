use axum::extract::{Request, State};
use axum::http::header::{HeaderValue, ORIGIN, VARY};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::SharedState;

/// Enforce the configured origin allow-list before any application logic
/// runs. Requests without an Origin header (same-origin, curl) always pass;
/// allowed cross-origin requests get the CORS response headers stamped on
/// the way out.
pub async fn enforce_origin(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req.headers().get(ORIGIN).cloned();

    let allowed = match &origin {
        None => true,
        Some(value) => value
            .to_str()
            .map(|o| {
                state
                    .config
                    .allowed_origins
                    .iter()
                    .any(|a| a == o.trim_end_matches('/'))
            })
            .unwrap_or(false),
    };

    if !allowed {
        tracing::debug!("Rejected request from disallowed origin {:?}", origin);
        return AppError::OriginDenied.into_response();
    }

    let mut response = next.run(req).await;

    if let Some(origin) = origin {
        let headers = response.headers_mut();
        headers.insert("access-control-allow-origin", origin);
        headers.insert(
            "access-control-allow-credentials",
            HeaderValue::from_static("true"),
        );
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }

    response
}
