use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;
use crate::submission::Submission;

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_MESSAGE_LEN: usize = 10;

/// Address shape only: local part, `@`, domain containing a dot, no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validate a submission before any external call is made. First failure wins.
pub fn check(submission: &Submission) -> Result<(), AppError> {
    if submission.name.chars().count() < MIN_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "name must be at least {MIN_NAME_LEN} characters"
        )));
    }

    if !EMAIL_RE.is_match(&submission.email) {
        return Err(AppError::InvalidInput(
            "email is not a valid address".to_string(),
        ));
    }

    if submission.message.chars().count() < MIN_MESSAGE_LEN {
        return Err(AppError::InvalidInput(format!(
            "message must be at least {MIN_MESSAGE_LEN} characters"
        )));
    }

    Ok(())
}
