//! # User Endpoints
//!
//! Public profiles, search and dashboard data under `/users`.

use serde::Serialize;
use shared::{ActivityResponse, PublicProfileResponse, UserListResponse, UserStatsResponse};

use super::client::ApiClient;
use crate::core::error::ApiError;

#[derive(Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
}

#[derive(Serialize)]
struct LimitQuery {
    limit: u32,
}

pub async fn public_profile(
    client: &ApiClient,
    username: &str,
) -> Result<PublicProfileResponse, ApiError> {
    client.get(&format!("/users/profile/{}", username)).await
}

pub async fn search_users(client: &ApiClient, query: &str) -> Result<UserListResponse, ApiError> {
    client.get_query("/users/search", &SearchQuery { q: query }).await
}

pub async fn top_users(client: &ApiClient, limit: u32) -> Result<UserListResponse, ApiError> {
    client.get_query("/users/top", &LimitQuery { limit }).await
}

pub async fn user_stats(client: &ApiClient) -> Result<UserStatsResponse, ApiError> {
    client.get("/users/stats").await
}

pub async fn user_activity(client: &ApiClient, limit: u32) -> Result<ActivityResponse, ApiError> {
    client.get_query("/users/activity", &LimitQuery { limit }).await
}
