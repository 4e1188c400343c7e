//! Editorial queue checkout.
//!
//! A queue row carries a single `editor_id`. Checking out simply overwrites
//! it; there is no compare-and-swap and no expiry. The holder only matters
//! when an editor records a decision: deciding on a row someone else has
//! checked out is refused.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Result of a checkout, reported back so the UI can warn about takeovers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutOutcome {
    pub editor_id: DbId,
    /// The editor who held the row before this checkout, if it was someone else.
    pub previous_editor_id: Option<DbId>,
}

impl CheckoutOutcome {
    pub fn took_over(&self) -> bool {
        self.previous_editor_id.is_some()
    }
}

/// Compute the outcome of `editor_id` checking out a row currently held by
/// `current_holder`.
pub fn checkout(current_holder: Option<DbId>, editor_id: DbId) -> CheckoutOutcome {
    CheckoutOutcome {
        editor_id,
        previous_editor_id: current_holder.filter(|holder| *holder != editor_id),
    }
}

/// Allow a decision by `editor_id` unless another editor holds the row.
pub fn ensure_can_decide(current_holder: Option<DbId>, editor_id: DbId) -> Result<(), CoreError> {
    match current_holder {
        Some(holder) if holder != editor_id => Err(CoreError::Conflict(format!(
            "Release is checked out by editor {holder}"
        ))),
        _ => Ok(()),
    }
}

/// Only the holder or an admin may drop a checkout.
pub fn ensure_can_release(
    current_holder: Option<DbId>,
    editor_id: DbId,
    is_admin: bool,
) -> Result<(), CoreError> {
    match current_holder {
        None => Err(CoreError::Conflict("Release is not checked out".to_string())),
        Some(holder) if holder == editor_id || is_admin => Ok(()),
        Some(holder) => Err(CoreError::Forbidden(format!(
            "Release is checked out by editor {holder}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn checkout_of_free_row() {
        let outcome = checkout(None, 7);
        assert_eq!(outcome.editor_id, 7);
        assert!(!outcome.took_over());
    }

    #[test]
    fn second_checkout_overwrites_and_reports_previous_holder() {
        let outcome = checkout(Some(7), 9);
        assert_eq!(outcome.editor_id, 9);
        assert_eq!(outcome.previous_editor_id, Some(7));
    }

    #[test]
    fn re_checkout_by_holder_is_not_a_takeover() {
        assert!(!checkout(Some(7), 7).took_over());
    }

    #[test]
    fn decision_guard() {
        assert!(ensure_can_decide(None, 1).is_ok());
        assert!(ensure_can_decide(Some(1), 1).is_ok());
        assert_matches!(ensure_can_decide(Some(2), 1), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn release_guard() {
        assert!(ensure_can_release(Some(1), 1, false).is_ok());
        assert!(ensure_can_release(Some(2), 1, true).is_ok());
        assert_matches!(
            ensure_can_release(Some(2), 1, false),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            ensure_can_release(None, 1, false),
            Err(CoreError::Conflict(_))
        );
    }
}
