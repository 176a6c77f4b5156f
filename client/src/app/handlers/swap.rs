//! # Swap Handlers
//!
//! Swap requests, owner redemption and the owner/requester transitions.
//!
//! Transitions are never applied optimistically: the displayed status only moves
//! once the server accepted the change and the swap queries were refetched.

use shared::{
    CancelRequest, CreateSwapRequest, Item, RateSwapRequest, RespondAction, RespondRequest,
    Swap, SwapMutationResponse, SwapOffer, SwapType, UserProfile,
};

use crate::app::lifecycle::{authorize, can_rate, SwapAction};
use crate::app::permissions::{default_swap_type, SwapIntent};
use crate::app::AppContext;
use crate::cache::ResourceKind;
use crate::core::error::{AppError, Result};
use crate::utils::validation::validate_rating;

pub const UNAVAILABLE_MESSAGE: &str =
    "This item is currently not available for swaps or redemption.";
pub const NO_OFFERED_ITEMS_MESSAGE: &str =
    "Please select at least one of your items to offer for swap.";
pub const INSUFFICIENT_POINTS_MESSAGE: &str = "Insufficient points balance";

/// Caches touched by a new swap or a redemption
const REQUEST_INVALIDATES: [ResourceKind; 5] = [
    ResourceKind::Swaps,
    ResourceKind::Swap,
    ResourceKind::Items,
    ResourceKind::UserStats,
    ResourceKind::UserActivity,
];

/// Input of the swap/redeem dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequestForm {
    pub intent: SwapIntent,
    /// Ignored for [`SwapIntent::Redeem`]
    pub swap_type: SwapType,
    pub offered_items: Vec<String>,
    pub message: String,
}

impl SwapRequestForm {
    /// Dialog defaults for `user` looking at `item`
    pub fn new(item: &Item, user: &UserProfile, intent: SwapIntent) -> Self {
        Self {
            intent,
            swap_type: default_swap_type(user.points, item.points_value, intent),
            offered_items: Vec::new(),
            message: String::new(),
        }
    }

    pub fn offering(mut self, item_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.swap_type = SwapType::Direct;
        self.offered_items = item_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn effective_type(&self) -> SwapType {
        match self.intent {
            SwapIntent::Redeem => SwapType::Points,
            SwapIntent::Swap => self.swap_type,
        }
    }
}

/// What a submitted swap dialog did
#[derive(Debug, Clone, PartialEq)]
pub enum SwapRequestOutcome {
    /// A pending swap was created
    Requested(SwapMutationResponse),
    /// The owner bought back their own listing
    Redeemed { points_deducted: i64 },
}

/// Submit the swap dialog
///
/// An owner redeeming their own item is routed to the owner-redemption endpoint;
/// everyone else creates a swap.
#[tracing::instrument(skip(ctx, item, form), fields(item_id = %item.id, intent = ?form.intent))]
pub(crate) async fn submit_request(
    ctx: &AppContext,
    item: &Item,
    form: &SwapRequestForm,
) -> Result<SwapRequestOutcome> {
    let user = ctx.session.user().ok_or(AppError::NotAuthenticated)?;

    if item.is_owned_by(&user.id) {
        return match form.intent {
            SwapIntent::Redeem => redeem_own(ctx, item, &user).await,
            SwapIntent::Swap => Err(AppError::Forbidden(
                "You cannot request a swap for your own item".to_string(),
            )),
        };
    }

    if !item.is_exchangeable() {
        return Err(AppError::Forbidden(UNAVAILABLE_MESSAGE.to_string()));
    }

    let offer = match form.effective_type() {
        SwapType::Direct => {
            if form.offered_items.is_empty() {
                return Err(AppError::validation("offeredItems", NO_OFFERED_ITEMS_MESSAGE));
            }
            SwapOffer::Direct {
                offered_items: form.offered_items.clone(),
            }
        }
        SwapType::Points => {
            check_balance(&user, item)?;
            SwapOffer::Points {
                points_offered: item.points_value,
            }
        }
    };

    let request = CreateSwapRequest {
        requested_item: item.id.clone(),
        message: form.message.clone(),
        offer,
    };
    let response = ctx.api.create_swap(&request).await?;

    tracing::info!(item_id = %item.id, swap_type = ?request.offer.swap_type(), "Swap requested");
    ctx.invalidate_all(&REQUEST_INVALIDATES);
    ctx.notifier.success("Swap request sent successfully!");
    Ok(SwapRequestOutcome::Requested(response))
}

async fn redeem_own(
    ctx: &AppContext,
    item: &Item,
    user: &UserProfile,
) -> Result<SwapRequestOutcome> {
    if !item.is_available {
        return Err(AppError::Forbidden(UNAVAILABLE_MESSAGE.to_string()));
    }
    check_balance(user, item)?;

    let response = ctx.api.redeem_by_owner(&item.id).await?;
    let points_deducted = response.points_deducted.unwrap_or(item.points_value);
    let remaining = response
        .remaining_points
        .unwrap_or(user.points - points_deducted);

    tracing::info!(item_id = %item.id, points_deducted, remaining, "Owner redeemed own item");
    ctx.session.update_points(remaining);
    ctx.invalidate_all(&REQUEST_INVALIDATES);
    ctx.cache.invalidate(ResourceKind::Item);
    ctx.cache.invalidate(ResourceKind::UserItems);
    ctx.notifier.success(format!(
        "Item purchased successfully! {} points deducted.",
        points_deducted
    ));
    Ok(SwapRequestOutcome::Redeemed { points_deducted })
}

/// A balance equal to the item's value is enough
fn check_balance(user: &UserProfile, item: &Item) -> Result<()> {
    if user.points >= item.points_value {
        Ok(())
    } else {
        Err(AppError::validation("pointsOffered", INSUFFICIENT_POINTS_MESSAGE))
    }
}

/// Owner accepts or rejects a pending swap
#[tracing::instrument(skip(ctx, swap, message), fields(swap_id = %swap.id))]
pub(crate) async fn respond(
    ctx: &AppContext,
    swap: &Swap,
    action: RespondAction,
    message: Option<String>,
) -> Result<SwapMutationResponse> {
    let swap_action = match action {
        RespondAction::Accept => SwapAction::Accept,
        RespondAction::Reject => SwapAction::Reject,
    };
    authorize(swap, ctx.session.user_id().as_deref(), swap_action)?;

    let request = RespondRequest {
        action,
        response_message: message.filter(|m| !m.trim().is_empty()),
    };
    let response = ctx.api.respond_swap(&swap.id, &request).await?;

    tracing::info!(swap_id = %swap.id, action = %swap_action, "Swap response sent");
    ctx.invalidate_all(&[ResourceKind::Swaps, ResourceKind::Swap, ResourceKind::UserStats]);
    ctx.notifier.success("Swap response sent successfully!");
    Ok(response)
}

#[tracing::instrument(skip(ctx, swap), fields(swap_id = %swap.id))]
pub(crate) async fn complete(ctx: &AppContext, swap: &Swap) -> Result<SwapMutationResponse> {
    authorize(swap, ctx.session.user_id().as_deref(), SwapAction::Complete)?;

    let response = ctx.api.complete_swap(&swap.id).await?;

    tracing::info!(swap_id = %swap.id, "Swap completed");
    ctx.invalidate_all(&[ResourceKind::Swaps, ResourceKind::Swap, ResourceKind::UserStats]);
    ctx.notifier.success("Swap completed successfully!");
    Ok(response)
}

/// Either party backs out of a pending or accepted swap
#[tracing::instrument(skip(ctx, swap, reason), fields(swap_id = %swap.id))]
pub(crate) async fn cancel(
    ctx: &AppContext,
    swap: &Swap,
    reason: Option<String>,
) -> Result<SwapMutationResponse> {
    authorize(swap, ctx.session.user_id().as_deref(), SwapAction::Cancel)?;

    let request = CancelRequest {
        reason: reason.filter(|r| !r.trim().is_empty()),
    };
    let response = ctx.api.cancel_swap(&swap.id, &request).await?;

    tracing::info!(swap_id = %swap.id, "Swap cancelled");
    ctx.invalidate_all(&[ResourceKind::Swaps, ResourceKind::Swap]);
    Ok(response)
}

#[tracing::instrument(skip(ctx, swap, review), fields(swap_id = %swap.id))]
pub(crate) async fn rate(
    ctx: &AppContext,
    swap: &Swap,
    rating: u8,
    review: Option<String>,
) -> Result<()> {
    let viewer = ctx.session.user_id();
    if viewer.is_none() {
        return Err(AppError::NotAuthenticated);
    }
    if !can_rate(swap, viewer.as_deref()) {
        return Err(AppError::Forbidden(
            "Only a party to a completed swap can rate it".to_string(),
        ));
    }
    validate_rating(rating).for_field("rating")?;

    let request = RateSwapRequest {
        rating,
        review: review.filter(|r| !r.trim().is_empty()),
    };
    ctx.api.rate_swap(&swap.id, &request).await?;

    ctx.invalidate_all(&[ResourceKind::Swap, ResourceKind::UserStats]);
    Ok(())
}
