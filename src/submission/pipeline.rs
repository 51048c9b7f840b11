use std::net::IpAddr;

use askama::Template;

use crate::email::{templates, DeliveryReceipt, Notification};
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{validate, Submission};

pub struct PipelineResult {
    pub receipt: DeliveryReceipt,
}

/// Run one submission through the relay pipeline: rate-limit gate, input
/// validation, token verification, notification dispatch. Every failure is
/// terminal for the request; nothing is persisted or retried.
pub async fn run(
    state: &SharedState,
    client_ip: IpAddr,
    submission: Submission,
) -> Result<PipelineResult, AppError> {
    if let Err(retry_after) = state.limiter.check(
        client_ip,
        state.config.rate_limit,
        state.config.rate_limit_window_secs,
    ) {
        return Err(AppError::RateLimited(retry_after));
    }

    validate::check(&submission)?;

    if let Some(verifier) = &state.verifier {
        let token = submission
            .verification_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)?;

        // An unreachable provider counts as failed verification.
        let verdict = verifier
            .verify(token)
            .await
            .map_err(|e| AppError::VerificationFailed(format!("provider unavailable: {e}")))?;

        if !verdict.success {
            return Err(AppError::VerificationFailed(
                "provider rejected the token".to_string(),
            ));
        }

        let min_score = state
            .config
            .captcha
            .as_ref()
            .map(|c| c.min_score)
            .unwrap_or(0.0);
        if verdict.score.unwrap_or(0.0) < min_score {
            return Err(AppError::VerificationFailed(format!(
                "score {:?} below threshold {min_score}",
                verdict.score
            )));
        }
    }

    let html = templates::NotificationTemplate {
        name: &submission.name,
        email: &submission.email,
        message: &submission.message,
    }
    .render()
    .map_err(|e| AppError::Internal(format!("Failed to render notification: {e}")))?;

    let mail = Notification {
        subject: templates::NOTIFICATION_SUBJECT.to_string(),
        html,
        reply_to: submission.email.clone(),
    };

    let receipt = state
        .mailer
        .dispatch(&mail)
        .await
        .map_err(AppError::Dispatch)?;

    tracing::info!("Relayed submission from {}", submission.email);

    Ok(PipelineResult { receipt })
}
