//! Session lifecycle states and the decisions the controller hands back to
//! the host.

use serde::{Deserialize, Serialize};

/// Where one player's session with one menu currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No display exists for the player.
    Closed,
    /// An open attempt passed its gates and the display is being created.
    OpenPending,
    /// The display is live.
    Open,
}

/// The result of an open attempt.
///
/// Callers decide how to surface a refusal; the player has already been sent
/// the relevant message or fail actions by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenOutcome {
    /// A display was created and initialised.
    Opened,
    /// The player lacks the menu's permission.
    NoPermission { permission: String },
    /// The view requirements failed.
    RequirementFailed,
}

impl OpenOutcome {
    pub fn is_opened(&self) -> bool {
        matches!(self, OpenOutcome::Opened)
    }
}

/// The controller's answer to a host close event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseDecision {
    /// Let the display close.
    Allow,
    /// The close requirements failed; the host must keep or reopen the display.
    Veto,
}

impl CloseDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, CloseDecision::Allow)
    }
}
