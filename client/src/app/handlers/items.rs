//! # Item Handlers
//!
//! Listing creation, likes and owner actions on a listing.

use shared::{
    ImageUpload, Item, ItemMutationResponse, ItemResponse, LikeResponse, NewItemFields,
};

use crate::app::queries::item_key;
use crate::app::routes::Route;
use crate::app::AppContext;
use crate::cache::ResourceKind;
use crate::core::error::{AppError, Result};
use crate::utils::validation::validate_item_form;

/// Publish a new listing
///
/// The form is checked in full before anything is uploaded.
#[tracing::instrument(skip_all, fields(title = %fields.title, images = images.len()))]
pub(crate) async fn create_item(
    ctx: &AppContext,
    fields: &NewItemFields,
    images: Vec<ImageUpload>,
) -> Result<ItemMutationResponse> {
    ctx.require_session()?;
    validate_item_form(fields, &images)?;

    let response = ctx.api.create_item(fields, images).await?;

    tracing::info!(
        item_id = response.item.as_ref().map(|i| i.id.as_str()).unwrap_or_default(),
        "Item created"
    );
    ctx.invalidate_all(&[
        ResourceKind::Items,
        ResourceKind::UserItems,
        ResourceKind::UserStats,
        ResourceKind::UserActivity,
    ]);
    ctx.notifier.success("Item added successfully!");
    ctx.notifier.navigate(Route::Dashboard);
    Ok(response)
}

/// Flip the viewer's like
///
/// The cached item detail shows the new state at once and is restored if the
/// server refuses.
#[tracing::instrument(skip(ctx))]
pub(crate) async fn toggle_like(ctx: &AppContext, item_id: &str) -> Result<LikeResponse> {
    ctx.require_session()?;

    let key = item_key(item_id);
    let response = ctx
        .cache
        .mutate_optimistic(
            &key,
            |cached: &mut ItemResponse| flip_like(&mut cached.item),
            ctx.api.toggle_like(item_id),
            &[ResourceKind::Items],
        )
        .await?;

    ctx.cache.invalidate_key(&key);
    Ok(response)
}

fn flip_like(item: &mut Item) {
    item.is_liked = !item.is_liked;
    item.likes_count = if item.is_liked {
        item.likes_count + 1
    } else {
        item.likes_count.saturating_sub(1)
    };
}

/// Owner takes a listing off the market
#[tracing::instrument(skip(ctx, item), fields(item_id = %item.id))]
pub(crate) async fn mark_unavailable(ctx: &AppContext, item: &Item) -> Result<()> {
    let user_id = ctx.session.user_id().ok_or(AppError::NotAuthenticated)?;
    if !item.is_owned_by(&user_id) {
        return Err(AppError::Forbidden(
            "Only the owner can mark this item unavailable".to_string(),
        ));
    }
    if !item.is_available {
        return Err(AppError::Forbidden("This item is already unavailable".to_string()));
    }

    ctx.api.mark_unavailable(&item.id).await?;

    tracing::info!(item_id = %item.id, "Item marked unavailable");
    ctx.invalidate_all(&[
        ResourceKind::Item,
        ResourceKind::UserStats,
        ResourceKind::UserActivity,
    ]);
    ctx.notifier.success("Item marked as unavailable successfully");
    ctx.notifier.navigate(Route::MyListings);
    Ok(())
}
