//! Stakeholder sign-off on a release.
//!
//! Approvals are requested by the release author and answered by someone
//! outside the user system, who is addressed only by the row's random UUID.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length of a stakeholder comment.
pub const MAX_COMMENT_LEN: u64 = 2000;

/// Author input for requesting a sign-off.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignOffRequest {
    /// Address the request is sent on behalf of.
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Stakeholder who must sign.
    #[validate(email(message = "email_to must be a valid address"))]
    pub email_to: String,
}

/// Stakeholder answer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignOffDecision {
    pub approved: bool,
    #[validate(length(max = MAX_COMMENT_LEN, message = "comment is too long"))]
    pub comment: Option<String>,
}

/// Where a sign-off stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignOffState {
    Pending,
    Approved,
    Declined,
}

pub fn sign_off_state(signed_at: Option<Timestamp>, approved: Option<bool>) -> SignOffState {
    match (signed_at, approved) {
        (Some(_), Some(true)) => SignOffState::Approved,
        (Some(_), _) => SignOffState::Declined,
        (None, _) => SignOffState::Pending,
    }
}

/// A sign-off can be answered exactly once.
pub fn ensure_unsigned(signed_at: Option<Timestamp>) -> Result<(), CoreError> {
    if signed_at.is_some() {
        return Err(CoreError::Conflict(
            "This approval has already been signed".to_string(),
        ));
    }
    Ok(())
}

/// Run `validator` rules and flatten failures into a [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|errors| {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .collect();
        messages.sort();
        CoreError::Validation(messages.join("; "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(email_to: &str) -> SignOffRequest {
        SignOffRequest {
            email: "author@acme.test".to_string(),
            email_to: email_to.to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate_input(&request("cfo@acme.test")).is_ok());
    }

    #[test]
    fn bad_recipient_rejected() {
        let result = validate_input(&request("not-an-email"));
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("email_to"));
    }

    #[test]
    fn long_comment_rejected() {
        let decision = SignOffDecision {
            approved: true,
            comment: Some("x".repeat(MAX_COMMENT_LEN as usize + 1)),
        };
        assert!(validate_input(&decision).is_err());
    }

    #[test]
    fn state_from_columns() {
        let now = chrono::Utc::now();
        assert_eq!(sign_off_state(None, None), SignOffState::Pending);
        assert_eq!(sign_off_state(Some(now), Some(true)), SignOffState::Approved);
        assert_eq!(sign_off_state(Some(now), Some(false)), SignOffState::Declined);
    }

    #[test]
    fn signed_rows_cannot_be_signed_again() {
        assert!(ensure_unsigned(None).is_ok());
        assert_matches!(
            ensure_unsigned(Some(chrono::Utc::now())),
            Err(CoreError::Conflict(_))
        );
    }
}
