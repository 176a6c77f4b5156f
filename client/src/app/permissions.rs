//! # Permissions
//!
//! What a viewer may do with an item, and how the swap list splits per viewer.

use shared::{Item, Swap, SwapStatus, SwapType, UserProfile};

/// Why the swap form was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapIntent {
    /// "Request Swap": the requester chooses direct or points
    Swap,
    /// "Redeem via Points": always points
    Redeem,
}

/// Item detail controls for one viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemActions {
    pub can_like: bool,
    pub can_request_swap: bool,
    pub can_redeem: bool,
    pub can_mark_unavailable: bool,
    /// The owner buying back their own listing
    pub can_redeem_own: bool,
}

impl ItemActions {
    pub fn for_viewer(item: &Item, viewer: Option<&UserProfile>) -> Self {
        let Some(viewer) = viewer else {
            return Self::default();
        };

        if item.is_owned_by(&viewer.id) {
            Self {
                can_like: true,
                can_mark_unavailable: item.is_available,
                can_redeem_own: item.is_available,
                ..Self::default()
            }
        } else {
            let exchangeable = item.is_exchangeable();
            Self {
                can_like: true,
                can_request_swap: exchangeable,
                can_redeem: exchangeable,
                ..Self::default()
            }
        }
    }

    pub fn any(&self) -> bool {
        self.can_like
            || self.can_request_swap
            || self.can_redeem
            || self.can_mark_unavailable
            || self.can_redeem_own
    }
}

/// Points when the balance covers the item, else direct; redemption is always points
pub fn default_swap_type(user_points: i64, item_points: i64, intent: SwapIntent) -> SwapType {
    match intent {
        SwapIntent::Redeem => SwapType::Points,
        SwapIntent::Swap if user_points >= item_points => SwapType::Points,
        SwapIntent::Swap => SwapType::Direct,
    }
}

/// `GET /swaps` split by the viewer's side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapLists {
    /// Swaps on the viewer's own items
    pub received: Vec<Swap>,
    /// Swaps the viewer requested
    pub sent: Vec<Swap>,
}

impl SwapLists {
    pub fn pending_received(&self) -> usize {
        count_pending(&self.received)
    }

    pub fn pending_sent(&self) -> usize {
        count_pending(&self.sent)
    }
}

fn count_pending(swaps: &[Swap]) -> usize {
    swaps
        .iter()
        .filter(|swap| swap.status == SwapStatus::Pending)
        .count()
}

pub fn partition_swaps(swaps: &[Swap], viewer_id: &str) -> SwapLists {
    let mut lists = SwapLists::default();
    for swap in swaps {
        if swap.owner_id() == Some(viewer_id) {
            lists.received.push(swap.clone());
        } else if swap.requester_id() == viewer_id {
            lists.sent.push(swap.clone());
        }
    }
    lists
}
