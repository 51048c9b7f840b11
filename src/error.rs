use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    MissingToken,
    VerificationFailed(String),
    OriginDenied,
    RateLimited(u64),
    Dispatch(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            AppError::MissingToken => write!(f, "Verification token is missing"),
            AppError::VerificationFailed(msg) => write!(f, "Verification failed: {msg}"),
            AppError::OriginDenied => write!(f, "Origin not allowed"),
            AppError::RateLimited(secs) => write!(f, "Rate limited, retry after {secs}s"),
            AppError::Dispatch(msg) => write!(f, "Dispatch failure: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingToken => (
                StatusCode::BAD_REQUEST,
                "Verification token is missing".to_string(),
            ),
            AppError::VerificationFailed(msg) => {
                tracing::info!("Submission rejected: verification failed: {msg}");
                (StatusCode::FORBIDDEN, "Verification failed".to_string())
            }
            AppError::OriginDenied => (StatusCode::FORBIDDEN, "Origin not allowed".to_string()),
            AppError::RateLimited(retry_after) => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    axum::Json(json!({
                        "message": "Too many requests, please try again later."
                    })),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert("retry-after", HeaderValue::from(*retry_after));
                return response;
            }
            AppError::Dispatch(msg) => {
                tracing::error!("Mail dispatch failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "message": message });
        (status, axum::Json(body)).into_response()
    }
}
