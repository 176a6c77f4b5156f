//! # Admin Handlers
//!
//! Moderation and user administration. Requests under `/admin` are never toasted
//! by the gateway, so failures here only reach the caller.

use shared::{
    AdminItemsQuery, AdminItemsResponse, ItemMutationResponse, RejectItemRequest, Role,
    UpdatePointsRequest, UpdateRoleRequest,
};

use crate::app::queries::admin_items_key;
use crate::app::AppContext;
use crate::cache::ResourceKind;
use crate::core::error::{AppError, Result};
use crate::utils::validation::validate_reject_reason;

const MODERATION_INVALIDATES: [ResourceKind; 3] = [
    ResourceKind::AdminItems,
    ResourceKind::Items,
    ResourceKind::AdminDashboard,
];

const USER_EDIT_INVALIDATES: [ResourceKind; 2] =
    [ResourceKind::AdminUsers, ResourceKind::AdminDashboard];

fn require_admin(ctx: &AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        return Err(AppError::NotAuthenticated);
    }
    if !ctx.session.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

/// Approve an item shown on the `page` of the moderation queue
#[tracing::instrument(skip(ctx, page))]
pub(crate) async fn approve_item(
    ctx: &AppContext,
    page: &AdminItemsQuery,
    item_id: &str,
) -> Result<ItemMutationResponse> {
    require_admin(ctx)?;

    let response = ctx
        .cache
        .mutate_optimistic(
            &admin_items_key(page),
            |cached: &mut AdminItemsResponse| {
                if let Some(item) = cached.items.iter_mut().find(|i| i.id == item_id) {
                    item.is_approved = true;
                    item.is_rejected = false;
                    item.rejection_reason = None;
                }
            },
            ctx.api.approve_item(item_id),
            &MODERATION_INVALIDATES,
        )
        .await?;

    tracing::info!(item_id, "Item approved");
    Ok(response)
}

#[tracing::instrument(skip(ctx, page, reason))]
pub(crate) async fn reject_item(
    ctx: &AppContext,
    page: &AdminItemsQuery,
    item_id: &str,
    reason: &str,
) -> Result<ItemMutationResponse> {
    require_admin(ctx)?;
    validate_reject_reason(reason).for_field("reason")?;

    let reason = reason.trim().to_string();
    let request = RejectItemRequest {
        reason: reason.clone(),
    };
    let response = ctx
        .cache
        .mutate_optimistic(
            &admin_items_key(page),
            |cached: &mut AdminItemsResponse| {
                if let Some(item) = cached.items.iter_mut().find(|i| i.id == item_id) {
                    item.is_approved = false;
                    item.is_rejected = true;
                    item.rejection_reason = Some(reason);
                }
            },
            ctx.api.reject_item(item_id, &request),
            &MODERATION_INVALIDATES,
        )
        .await?;

    tracing::info!(item_id, "Item rejected");
    Ok(response)
}

#[tracing::instrument(skip(ctx))]
pub(crate) async fn delete_item(ctx: &AppContext, item_id: &str) -> Result<()> {
    require_admin(ctx)?;

    ctx.api.admin_delete_item(item_id).await?;

    tracing::info!(item_id, "Item deleted by admin");
    ctx.invalidate_all(&MODERATION_INVALIDATES);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub(crate) async fn update_user_role(ctx: &AppContext, user_id: &str, role: Role) -> Result<()> {
    require_admin(ctx)?;

    ctx.api
        .update_user_role(user_id, &UpdateRoleRequest { role })
        .await?;

    tracing::info!(user_id, ?role, "User role updated");
    ctx.invalidate_all(&USER_EDIT_INVALIDATES);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub(crate) async fn update_user_points(ctx: &AppContext, user_id: &str, points: i64) -> Result<()> {
    require_admin(ctx)?;
    if points < 0 {
        return Err(AppError::validation("points", "Points cannot be negative"));
    }

    ctx.api
        .update_user_points(user_id, &UpdatePointsRequest { points })
        .await?;

    tracing::info!(user_id, points, "User points updated");
    ctx.invalidate_all(&USER_EDIT_INVALIDATES);
    Ok(())
}
