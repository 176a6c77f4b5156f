//! # Swap Lifecycle
//!
//! The swap state machine and who may drive it.
//!
//! ```text
//! pending ──accept──▶ accepted ──complete──▶ completed
//!    │                    │
//!    ├──reject──▶ rejected│
//!    └──cancel──▶ cancelled ◀──cancel──┘
//! ```
//!
//! Accept, reject and complete belong to the requested item's owner; either party
//! may cancel. The server has the final word, so these checks decide which
//! controls are offered and stop requests that could only fail.

use std::fmt;

use shared::{Swap, SwapStatus};

use crate::core::error::{AppError, Result};

/// Transition a party can request on a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapAction {
    Accept,
    Reject,
    Complete,
    Cancel,
}

impl SwapAction {
    pub const ALL: [SwapAction; 4] = [
        SwapAction::Accept,
        SwapAction::Reject,
        SwapAction::Complete,
        SwapAction::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapAction::Accept => "accept",
            SwapAction::Reject => "reject",
            SwapAction::Complete => "complete",
            SwapAction::Cancel => "cancel",
        }
    }

    fn owner_only(&self) -> bool {
        !matches!(self, SwapAction::Cancel)
    }
}

impl fmt::Display for SwapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the viewer relates to a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRole {
    /// Owns the requested item
    Owner,
    Requester,
    /// Neither party
    Observer,
}

impl SwapRole {
    pub fn of(swap: &Swap, viewer_id: &str) -> Self {
        if swap.owner_id() == Some(viewer_id) {
            SwapRole::Owner
        } else if swap.requester_id() == viewer_id {
            SwapRole::Requester
        } else {
            SwapRole::Observer
        }
    }

    pub fn is_party(&self) -> bool {
        !matches!(self, SwapRole::Observer)
    }
}

/// Next status for `action`, or an error if the machine has no such edge
pub fn transition(from: SwapStatus, action: SwapAction) -> Result<SwapStatus> {
    use SwapAction::*;
    use SwapStatus::*;

    match (from, action) {
        (Pending, Accept) => Ok(Accepted),
        (Pending, Reject) => Ok(Rejected),
        (Accepted, Complete) => Ok(Completed),
        (Pending | Accepted, Cancel) => Ok(Cancelled),
        _ => Err(AppError::InvalidTransition { from, action }),
    }
}

/// Actions reachable from `status`, ignoring who asks
pub fn available_actions(status: SwapStatus) -> Vec<SwapAction> {
    SwapAction::ALL
        .into_iter()
        .filter(|action| transition(status, *action).is_ok())
        .collect()
}

/// Check that `viewer_id` may perform `action` on `swap` now
///
/// Returns the status the swap will move to.
pub fn authorize(swap: &Swap, viewer_id: Option<&str>, action: SwapAction) -> Result<SwapStatus> {
    let viewer_id = viewer_id.ok_or(AppError::NotAuthenticated)?;

    match SwapRole::of(swap, viewer_id) {
        SwapRole::Observer => {
            return Err(AppError::Forbidden(
                "You are not a party to this swap".to_string(),
            ))
        }
        SwapRole::Requester if action.owner_only() => {
            return Err(AppError::Forbidden(format!(
                "Only the item owner can {} this swap",
                action
            )))
        }
        _ => {}
    }

    transition(swap.status, action)
}

/// Which swap controls to show a viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapControls {
    /// Accept and reject
    pub can_respond: bool,
    pub can_complete: bool,
    pub can_cancel: bool,
    pub can_rate: bool,
}

impl SwapControls {
    pub fn for_viewer(swap: &Swap, viewer_id: Option<&str>) -> Self {
        let allowed = |action| authorize(swap, viewer_id, action).is_ok();

        Self {
            can_respond: allowed(SwapAction::Accept) && allowed(SwapAction::Reject),
            can_complete: allowed(SwapAction::Complete),
            can_cancel: allowed(SwapAction::Cancel),
            can_rate: can_rate(swap, viewer_id),
        }
    }

    pub fn any(&self) -> bool {
        self.can_respond || self.can_complete || self.can_cancel || self.can_rate
    }
}

/// Ratings are left by a party once the swap is completed
pub fn can_rate(swap: &Swap, viewer_id: Option<&str>) -> bool {
    swap.status == SwapStatus::Completed
        && viewer_id.is_some_and(|id| SwapRole::of(swap, id).is_party())
}
