//! # Admin Endpoints
//!
//! Moderation, user administration and reports under `/admin`.
//!
//! Failures here never produce a global toast; admin pages render their own errors.

use shared::{
    AdminDashboardResponse, AdminItemsQuery, AdminItemsResponse, AdminUsersQuery,
    AdminUsersResponse, ItemMutationResponse, MessageResponse, RejectItemRequest, ReportResponse,
    ReportsQuery, UpdatePointsRequest, UpdateRoleRequest,
};

use super::client::ApiClient;
use crate::core::error::ApiError;

pub async fn dashboard(client: &ApiClient) -> Result<AdminDashboardResponse, ApiError> {
    client.get("/admin/dashboard").await
}

pub async fn items(
    client: &ApiClient,
    query: &AdminItemsQuery,
) -> Result<AdminItemsResponse, ApiError> {
    client.get_query("/admin/items", query).await
}

#[tracing::instrument(skip(client))]
pub async fn approve_item(client: &ApiClient, id: &str) -> Result<ItemMutationResponse, ApiError> {
    client.put_empty(&format!("/admin/items/{}/approve", id)).await
}

#[tracing::instrument(skip(client, request))]
pub async fn reject_item(
    client: &ApiClient,
    id: &str,
    request: &RejectItemRequest,
) -> Result<ItemMutationResponse, ApiError> {
    client.put_json(&format!("/admin/items/{}/reject", id), request).await
}

pub async fn delete_item(client: &ApiClient, id: &str) -> Result<MessageResponse, ApiError> {
    client.delete(&format!("/admin/items/{}", id)).await
}

pub async fn users(
    client: &ApiClient,
    query: &AdminUsersQuery,
) -> Result<AdminUsersResponse, ApiError> {
    client.get_query("/admin/users", query).await
}

#[tracing::instrument(skip(client, request), fields(role = ?request.role))]
pub async fn update_user_role(
    client: &ApiClient,
    id: &str,
    request: &UpdateRoleRequest,
) -> Result<MessageResponse, ApiError> {
    client.put_json(&format!("/admin/users/{}/role", id), request).await
}

#[tracing::instrument(skip(client, request), fields(points = request.points))]
pub async fn update_user_points(
    client: &ApiClient,
    id: &str,
    request: &UpdatePointsRequest,
) -> Result<MessageResponse, ApiError> {
    client.put_json(&format!("/admin/users/{}/points", id), request).await
}

pub async fn reports(client: &ApiClient, query: &ReportsQuery) -> Result<ReportResponse, ApiError> {
    client.get_query("/admin/reports", query).await
}
