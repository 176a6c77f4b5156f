use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::item::ItemRef;
use super::user::UserRef;

/// Lifecycle status of a swap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Completed => "completed",
            SwapStatus::Cancelled => "cancelled",
        }
    }

    /// Rejected, completed and cancelled swaps never change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwapStatus::Rejected | SwapStatus::Completed | SwapStatus::Cancelled
        )
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the requester pays for the requested item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SwapType {
    Direct,
    Points,
}

/// What the requester offers in exchange
///
/// Exactly one of offered items or points exists, chosen by the swap type. On the
/// wire the variant is the `swapType` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "swapType", rename_all = "lowercase")]
pub enum SwapOffer {
    #[serde(rename_all = "camelCase")]
    Direct { offered_items: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Points { points_offered: i64 },
}

impl SwapOffer {
    pub fn swap_type(&self) -> SwapType {
        match self {
            SwapOffer::Direct { .. } => SwapType::Direct,
            SwapOffer::Points { .. } => SwapType::Points,
        }
    }
}

/// `POST /swaps`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequest {
    pub requested_item: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub offer: SwapOffer,
}

/// A proposed or settled exchange between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub requested_item: ItemRef,
    #[serde(default)]
    pub owner: Option<UserRef>,
    pub requester: UserRef,
    pub swap_type: SwapType,
    #[serde(default)]
    pub offered_items: Vec<ItemRef>,
    #[serde(default)]
    pub points_offered: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response_message: Option<String>,
    pub status: SwapStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Swap {
    /// Owner of the requested item
    ///
    /// Prefers the requested item's populated owner and falls back to the swap's own
    /// `owner` field, matching how listings report ownership.
    pub fn owner_id(&self) -> Option<&str> {
        self.requested_item
            .item()
            .and_then(|item| item.owner_id())
            .or_else(|| self.owner.as_ref().map(UserRef::id))
    }

    pub fn requester_id(&self) -> &str {
        self.requester.id()
    }

    /// Typed view of the offer, or `None` when the payload violates the
    /// one-of invariant for its swap type
    pub fn offer(&self) -> Option<SwapOffer> {
        match self.swap_type {
            SwapType::Direct if !self.offered_items.is_empty() => Some(SwapOffer::Direct {
                offered_items: self
                    .offered_items
                    .iter()
                    .map(|item| item.id().to_string())
                    .collect(),
            }),
            SwapType::Points => self
                .points_offered
                .map(|points_offered| SwapOffer::Points { points_offered }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapResponse {
    pub swap: Swap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SwapsResponse {
    #[serde(default)]
    pub swaps: Vec<Swap>,
}

/// Body of swap mutations; the backend may or may not echo the updated swap
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwapMutationResponse {
    pub message: String,
    pub swap: Option<Swap>,
}

/// Owner's answer to a pending swap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Accept,
    Reject,
}

/// `PUT /swaps/:id/respond`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub action: RespondAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
}

/// `PUT /swaps/:id/cancel`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CancelRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `POST /swaps/:id/rate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateSwapRequest {
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}
