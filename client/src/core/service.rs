//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.
//!
//! [`MarketplaceApi`] is the full backend surface. Production code uses
//! [`crate::services::api::ApiClient`]; tests substitute recording fakes so that
//! workflow rules can be checked without a server.

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    ActivityResponse, AdminDashboardResponse, AdminItemsQuery, AdminItemsResponse,
    AdminUsersQuery, AdminUsersResponse, AuthResponse, CancelRequest, ChangePasswordRequest,
    CreateSwapRequest, ImageUpload, ItemFilters, ItemMutationResponse, ItemResponse,
    ItemsResponse, LikeResponse, LoginRequest, MessageResponse, NewItemFields,
    PublicProfileResponse, RateSwapRequest, RedeemOwnerResponse, RegisterRequest,
    RejectItemRequest, ReportResponse, ReportsQuery, RespondRequest, SwapMutationResponse,
    SwapResponse, SwapsResponse, UpdateItemRequest, UpdatePointsRequest, UpdateProfileRequest,
    UpdateRoleRequest, UserItemsQuery, UserListResponse, UserResponse, UserStatsResponse,
};

use crate::core::error::ApiError;

/// Trait for backend API operations
///
/// One method per REST endpoint. Every method goes through the gateway's
/// cross-cutting policy (bearer token, forced logout on 401, error toasts).
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    // Auth
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;
    async fn current_user(&self) -> Result<UserResponse, ApiError>;
    async fn update_profile(&self, request: &UpdateProfileRequest)
        -> Result<UserResponse, ApiError>;
    async fn upload_avatar(&self, image: ImageUpload) -> Result<UserResponse, ApiError>;
    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError>;

    // Items
    async fn list_items(&self, filters: &ItemFilters) -> Result<ItemsResponse, ApiError>;
    async fn featured_items(&self) -> Result<ItemsResponse, ApiError>;
    async fn get_item(&self, id: &str) -> Result<ItemResponse, ApiError>;
    async fn create_item(
        &self,
        fields: &NewItemFields,
        images: Vec<ImageUpload>,
    ) -> Result<ItemMutationResponse, ApiError>;
    async fn update_item(
        &self,
        id: &str,
        request: &UpdateItemRequest,
    ) -> Result<ItemMutationResponse, ApiError>;
    async fn delete_item(&self, id: &str) -> Result<MessageResponse, ApiError>;
    async fn toggle_like(&self, id: &str) -> Result<LikeResponse, ApiError>;
    async fn user_items(
        &self,
        user_id: &str,
        query: &UserItemsQuery,
    ) -> Result<ItemsResponse, ApiError>;
    async fn mark_unavailable(&self, id: &str) -> Result<MessageResponse, ApiError>;
    async fn redeem_by_owner(&self, id: &str) -> Result<RedeemOwnerResponse, ApiError>;

    // Swaps
    async fn create_swap(
        &self,
        request: &CreateSwapRequest,
    ) -> Result<SwapMutationResponse, ApiError>;
    async fn list_swaps(&self) -> Result<SwapsResponse, ApiError>;
    async fn get_swap(&self, id: &str) -> Result<SwapResponse, ApiError>;
    async fn respond_swap(
        &self,
        id: &str,
        request: &RespondRequest,
    ) -> Result<SwapMutationResponse, ApiError>;
    async fn complete_swap(&self, id: &str) -> Result<SwapMutationResponse, ApiError>;
    async fn cancel_swap(
        &self,
        id: &str,
        request: &CancelRequest,
    ) -> Result<SwapMutationResponse, ApiError>;
    async fn rate_swap(
        &self,
        id: &str,
        request: &RateSwapRequest,
    ) -> Result<MessageResponse, ApiError>;

    // Users
    async fn public_profile(&self, username: &str) -> Result<PublicProfileResponse, ApiError>;
    async fn search_users(&self, query: &str) -> Result<UserListResponse, ApiError>;
    async fn top_users(&self, limit: u32) -> Result<UserListResponse, ApiError>;
    async fn user_stats(&self) -> Result<UserStatsResponse, ApiError>;
    async fn user_activity(&self, limit: u32) -> Result<ActivityResponse, ApiError>;

    // Admin
    async fn admin_dashboard(&self) -> Result<AdminDashboardResponse, ApiError>;
    async fn admin_items(&self, query: &AdminItemsQuery) -> Result<AdminItemsResponse, ApiError>;
    async fn approve_item(&self, id: &str) -> Result<ItemMutationResponse, ApiError>;
    async fn reject_item(
        &self,
        id: &str,
        request: &RejectItemRequest,
    ) -> Result<ItemMutationResponse, ApiError>;
    async fn admin_delete_item(&self, id: &str) -> Result<MessageResponse, ApiError>;
    async fn admin_users(&self, query: &AdminUsersQuery) -> Result<AdminUsersResponse, ApiError>;
    async fn update_user_role(
        &self,
        id: &str,
        request: &UpdateRoleRequest,
    ) -> Result<MessageResponse, ApiError>;
    async fn update_user_points(
        &self,
        id: &str,
        request: &UpdatePointsRequest,
    ) -> Result<MessageResponse, ApiError>;
    async fn admin_reports(&self, query: &ReportsQuery) -> Result<ReportResponse, ApiError>;

    // Health
    async fn health(&self) -> Result<Value, ApiError>;
}
