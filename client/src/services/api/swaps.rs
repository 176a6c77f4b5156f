//! # Swap Endpoints
//!
//! Swap creation and lifecycle transitions under `/swaps`.

use shared::{
    CancelRequest, CreateSwapRequest, MessageResponse, RateSwapRequest, RespondRequest,
    SwapMutationResponse, SwapResponse, SwapsResponse,
};

use super::client::ApiClient;
use crate::core::error::ApiError;

#[tracing::instrument(skip(client, request), fields(
    requested_item = %request.requested_item,
    swap_type = ?request.offer.swap_type()
))]
pub async fn create_swap(
    client: &ApiClient,
    request: &CreateSwapRequest,
) -> Result<SwapMutationResponse, ApiError> {
    tracing::info!("Creating swap request");
    client.post_json("/swaps", request).await
}

/// All swaps visible to the current user, sent and received.
pub async fn list_swaps(client: &ApiClient) -> Result<SwapsResponse, ApiError> {
    client.get("/swaps").await
}

pub async fn get_swap(client: &ApiClient, id: &str) -> Result<SwapResponse, ApiError> {
    client.get(&format!("/swaps/{}", id)).await
}

#[tracing::instrument(skip(client, request), fields(action = ?request.action))]
pub async fn respond_swap(
    client: &ApiClient,
    id: &str,
    request: &RespondRequest,
) -> Result<SwapMutationResponse, ApiError> {
    client.put_json(&format!("/swaps/{}/respond", id), request).await
}

#[tracing::instrument(skip(client))]
pub async fn complete_swap(client: &ApiClient, id: &str) -> Result<SwapMutationResponse, ApiError> {
    client.put_empty(&format!("/swaps/{}/complete", id)).await
}

#[tracing::instrument(skip(client, request))]
pub async fn cancel_swap(
    client: &ApiClient,
    id: &str,
    request: &CancelRequest,
) -> Result<SwapMutationResponse, ApiError> {
    client.put_json(&format!("/swaps/{}/cancel", id), request).await
}

pub async fn rate_swap(
    client: &ApiClient,
    id: &str,
    request: &RateSwapRequest,
) -> Result<MessageResponse, ApiError> {
    client.post_json(&format!("/swaps/{}/rate", id), request).await
}
