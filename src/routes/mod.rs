pub mod send_email;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(status))
        .route(
            "/send-email",
            post(send_email::send_email).options(send_email::send_email_options),
        )
}

/// Unauthenticated health path; always 200 regardless of pipeline state.
async fn status() -> &'static str {
    "Server is running"
}
