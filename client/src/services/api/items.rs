//! # Item Endpoints
//!
//! Listings, item detail, creation and engagement under `/items`.

use reqwest::multipart::Form;
use shared::{
    ImageUpload, ItemFilters, ItemMutationResponse, ItemResponse, ItemsResponse, LikeResponse,
    MessageResponse, NewItemFields, RedeemOwnerResponse, UpdateItemRequest, UserItemsQuery,
};

use super::auth::image_part;
use super::client::ApiClient;
use crate::core::error::ApiError;

pub async fn list_items(
    client: &ApiClient,
    filters: &ItemFilters,
) -> Result<ItemsResponse, ApiError> {
    client.get_query("/items", filters).await
}

pub async fn featured_items(client: &ApiClient) -> Result<ItemsResponse, ApiError> {
    client.get("/items/featured").await
}

pub async fn get_item(client: &ApiClient, id: &str) -> Result<ItemResponse, ApiError> {
    client.get(&format!("/items/{}", id)).await
}

/// Create a listing: text fields plus one `images` part per image.
#[tracing::instrument(
    skip(client, fields, images),
    fields(title = %fields.title, images = images.len())
)]
pub async fn create_item(
    client: &ApiClient,
    fields: &NewItemFields,
    images: Vec<ImageUpload>,
) -> Result<ItemMutationResponse, ApiError> {
    let mut form = Form::new()
        .text("title", fields.title.clone())
        .text("description", fields.description.clone())
        .text("category", fields.category.as_str())
        .text("size", fields.size.as_str())
        .text("condition", fields.condition.as_str())
        .text("pointsValue", fields.points_value.to_string());

    if !fields.tags.is_empty() {
        form = form.text("tags", fields.tags.join(","));
    }
    for image in images {
        form = form.part("images", image_part(image)?);
    }

    client.post_multipart("/items", form).await
}

pub async fn update_item(
    client: &ApiClient,
    id: &str,
    request: &UpdateItemRequest,
) -> Result<ItemMutationResponse, ApiError> {
    client.put_json(&format!("/items/{}", id), request).await
}

pub async fn delete_item(client: &ApiClient, id: &str) -> Result<MessageResponse, ApiError> {
    client.delete(&format!("/items/{}", id)).await
}

pub async fn toggle_like(client: &ApiClient, id: &str) -> Result<LikeResponse, ApiError> {
    client.post_empty(&format!("/items/{}/like", id)).await
}

pub async fn user_items(
    client: &ApiClient,
    user_id: &str,
    query: &UserItemsQuery,
) -> Result<ItemsResponse, ApiError> {
    client.get_query(&format!("/items/user/{}", user_id), query).await
}

pub async fn mark_unavailable(client: &ApiClient, id: &str) -> Result<MessageResponse, ApiError> {
    client.post_empty(&format!("/items/{}/mark-unavailable", id)).await
}

/// Owner buys back their own listing; no body beyond the id in the path.
#[tracing::instrument(skip(client))]
pub async fn redeem_by_owner(
    client: &ApiClient,
    id: &str,
) -> Result<RedeemOwnerResponse, ApiError> {
    tracing::info!("Owner redemption");
    client.post_empty(&format!("/items/{}/redeem-owner", id)).await
}
