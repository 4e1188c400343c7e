//! Press release lifecycle.
//!
//! ```text
//! start -> draft -> draftnxt -submit-> editorial -approve-> approved -publish-> sent
//!                     ^                 |  |                  ^
//!                     +-retract/reject--+  +-hold-> hold -----+
//! ```
//!
//! A release is editable (wizard edits, distribution upgrades, delete) until
//! it enters one of the locked states: `editorial`, `approved` or `sent`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Start,
    Draft,
    #[serde(rename = "draftnxt")]
    DraftNext,
    Editorial,
    Hold,
    Approved,
    Sent,
}

/// Status a newly created release starts in.
pub const INITIAL_STATUS: ReleaseStatus = ReleaseStatus::DraftNext;

/// What moved a release from one status to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Author advancing through the creation wizard.
    Wizard,
    /// Author submitting for editorial review.
    Submit,
    /// Author pulling the release back out of review.
    Retract,
    /// Editor approving for distribution.
    Approve,
    /// Editor parking the release for later.
    Hold,
    /// Editor sending the release back to the author.
    Reject,
    /// Distribution finished.
    Publish,
}

impl ReleaseStatus {
    pub const ALL: [ReleaseStatus; 7] = [
        ReleaseStatus::Start,
        ReleaseStatus::Draft,
        ReleaseStatus::DraftNext,
        ReleaseStatus::Editorial,
        ReleaseStatus::Hold,
        ReleaseStatus::Approved,
        ReleaseStatus::Sent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseStatus::Start => "start",
            ReleaseStatus::Draft => "draft",
            ReleaseStatus::DraftNext => "draftnxt",
            ReleaseStatus::Editorial => "editorial",
            ReleaseStatus::Hold => "hold",
            ReleaseStatus::Approved => "approved",
            ReleaseStatus::Sent => "sent",
        }
    }

    /// Locked releases can no longer be edited, upgraded or deleted.
    pub fn is_locked(self) -> bool {
        matches!(
            self,
            ReleaseStatus::Editorial | ReleaseStatus::Approved | ReleaseStatus::Sent
        )
    }

    /// Whether the release sits in the editorial queue in this status.
    pub fn is_under_review(self) -> bool {
        matches!(self, ReleaseStatus::Editorial | ReleaseStatus::Hold)
    }

    /// The status `transition` leads to from `self`, if it is allowed.
    pub fn next(self, transition: Transition, target: ReleaseStatus) -> Option<ReleaseStatus> {
        use ReleaseStatus::*;
        let allowed = match (transition, self, target) {
            (Transition::Wizard, Start, Draft) => true,
            (Transition::Wizard, Start | Draft, DraftNext) => true,
            (Transition::Submit, Start | Draft | DraftNext | Hold, Editorial) => true,
            (Transition::Retract, Editorial, DraftNext) => true,
            (Transition::Approve, Editorial | Hold, Approved) => true,
            (Transition::Hold, Editorial, Hold) => true,
            (Transition::Reject, Editorial | Hold, DraftNext) => true,
            (Transition::Publish, Approved, Sent) => true,
            _ => false,
        };
        allowed.then_some(target)
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReleaseStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| CoreError::Internal(format!("Unknown release status '{s}'")))
    }
}

impl TryFrom<String> for ReleaseStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Transition {
    /// The fixed destination of every transition except [`Transition::Wizard`],
    /// whose target is chosen by the author.
    pub fn default_target(self) -> Option<ReleaseStatus> {
        match self {
            Transition::Wizard => None,
            Transition::Submit => Some(ReleaseStatus::Editorial),
            Transition::Retract | Transition::Reject => Some(ReleaseStatus::DraftNext),
            Transition::Approve => Some(ReleaseStatus::Approved),
            Transition::Hold => Some(ReleaseStatus::Hold),
            Transition::Publish => Some(ReleaseStatus::Sent),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Transition::Wizard => "wizard",
            Transition::Submit => "submit",
            Transition::Retract => "retract",
            Transition::Approve => "approve",
            Transition::Hold => "hold",
            Transition::Reject => "reject",
            Transition::Publish => "publish",
        }
    }
}

/// Validate `transition` from `current` and return the resulting status.
///
/// Fails with [`CoreError::Conflict`] when the release is not in a status the
/// transition can start from.
pub fn apply_transition(
    current: ReleaseStatus,
    transition: Transition,
) -> Result<ReleaseStatus, CoreError> {
    let target = transition.default_target().ok_or_else(|| {
        CoreError::Internal("Wizard transitions need an explicit target".to_string())
    })?;
    current.next(transition, target).ok_or_else(|| {
        CoreError::Conflict(format!(
            "Cannot {} a release in status '{current}'",
            transition.name()
        ))
    })
}

/// Validate a wizard step moving `current` to `target`.
pub fn apply_wizard_step(
    current: ReleaseStatus,
    target: ReleaseStatus,
) -> Result<ReleaseStatus, CoreError> {
    if current == target {
        return Ok(current);
    }
    current
        .next(Transition::Wizard, target)
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Cannot move a release from '{current}' to '{target}' in the wizard"
            ))
        })
}

/// Reject edits to a release in a locked status.
pub fn ensure_mutable(status: ReleaseStatus) -> Result<(), CoreError> {
    if status.is_locked() {
        return Err(CoreError::Conflict(format!(
            "Release is locked while in status '{status}'"
        )));
    }
    Ok(())
}

/// Reject deletion of a release in a locked status.
pub fn ensure_deletable(status: ReleaseStatus) -> Result<(), CoreError> {
    if status.is_locked() {
        return Err(CoreError::Conflict(format!(
            "Release cannot be deleted while in status '{status}'"
        )));
    }
    Ok(())
}
