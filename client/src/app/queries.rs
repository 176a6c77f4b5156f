//! # Queries
//!
//! One constructor per cached resource. Each binds the cache key, the refetch
//! options and the API call, so every screen reading a resource shares one entry.

use std::sync::Arc;
use std::time::Duration;

use shared::{
    ActivityResponse, AdminDashboardResponse, AdminItemsQuery, AdminItemsResponse,
    AdminUsersQuery, AdminUsersResponse, ItemFilters, ItemResponse, ItemsResponse,
    ReportResponse, ReportsQuery, SwapResponse, SwapsResponse, UserItemsQuery,
    UserStatsResponse,
};

use crate::cache::{Query, QueryKey, QueryOptions, ResourceKind};
use crate::core::service::MarketplaceApi;

/// Dashboard widgets poll this often while shown
pub const DASHBOARD_REFRESH: Duration = Duration::from_secs(60);

/// Entries in the dashboard activity feed
pub const DASHBOARD_ACTIVITY_LIMIT: u32 = 5;

type Api = Arc<dyn MarketplaceApi>;

fn dashboard_options() -> QueryOptions {
    QueryOptions::default()
        .refetch_every(DASHBOARD_REFRESH)
        .refetch_on_focus()
}

pub fn items_key(filters: &ItemFilters) -> QueryKey {
    QueryKey::from_params(ResourceKind::Items, filters)
}

pub fn item_key(id: &str) -> QueryKey {
    QueryKey::id(ResourceKind::Item, id)
}

pub fn swap_key(id: &str) -> QueryKey {
    QueryKey::id(ResourceKind::Swap, id)
}

pub fn user_items_key(user_id: &str, query: &UserItemsQuery) -> QueryKey {
    QueryKey::from_params(ResourceKind::UserItems, query).with_param("userId", user_id)
}

pub fn admin_items_key(query: &AdminItemsQuery) -> QueryKey {
    QueryKey::from_params(ResourceKind::AdminItems, query)
}

/// Browse listing for a filter set
pub fn items(api: &Api, filters: ItemFilters) -> Query<ItemsResponse> {
    let api = api.clone();
    Query::new(items_key(&filters), QueryOptions::default(), move || {
        let api = api.clone();
        let filters = filters.clone();
        async move { api.list_items(&filters).await }
    })
}

pub fn featured_items(api: &Api) -> Query<ItemsResponse> {
    let api = api.clone();
    Query::new(
        QueryKey::new(ResourceKind::FeaturedItems),
        QueryOptions::default(),
        move || {
            let api = api.clone();
            async move { api.featured_items().await }
        },
    )
}

pub fn item(api: &Api, id: &str) -> Query<ItemResponse> {
    let api = api.clone();
    let id = id.to_string();
    Query::new(item_key(&id), QueryOptions::default(), move || {
        let api = api.clone();
        let id = id.clone();
        async move { api.get_item(&id).await }
    })
}

/// A user's own listings; the direct-swap picker asks for available, approved ones
pub fn user_items(api: &Api, user_id: &str, query: UserItemsQuery) -> Query<ItemsResponse> {
    let api = api.clone();
    let user_id = user_id.to_string();
    Query::new(
        user_items_key(&user_id, &query),
        QueryOptions::default(),
        move || {
            let api = api.clone();
            let user_id = user_id.clone();
            let query = query.clone();
            async move { api.user_items(&user_id, &query).await }
        },
    )
}

pub fn swaps(api: &Api) -> Query<SwapsResponse> {
    let api = api.clone();
    Query::new(
        QueryKey::new(ResourceKind::Swaps),
        QueryOptions::default(),
        move || {
            let api = api.clone();
            async move { api.list_swaps().await }
        },
    )
}

pub fn swap(api: &Api, id: &str) -> Query<SwapResponse> {
    let api = api.clone();
    let id = id.to_string();
    Query::new(swap_key(&id), QueryOptions::default(), move || {
        let api = api.clone();
        let id = id.clone();
        async move { api.get_swap(&id).await }
    })
}

/// Dashboard counters, polled and refreshed on focus
pub fn user_stats(api: &Api) -> Query<UserStatsResponse> {
    let api = api.clone();
    Query::new(
        QueryKey::new(ResourceKind::UserStats),
        dashboard_options(),
        move || {
            let api = api.clone();
            async move { api.user_stats().await }
        },
    )
}

pub fn user_activity(api: &Api, limit: u32) -> Query<ActivityResponse> {
    let api = api.clone();
    Query::new(
        QueryKey::new(ResourceKind::UserActivity).with_param("limit", limit),
        dashboard_options(),
        move || {
            let api = api.clone();
            async move { api.user_activity(limit).await }
        },
    )
}

pub fn admin_dashboard(api: &Api) -> Query<AdminDashboardResponse> {
    let api = api.clone();
    Query::new(
        QueryKey::new(ResourceKind::AdminDashboard),
        QueryOptions::default(),
        move || {
            let api = api.clone();
            async move { api.admin_dashboard().await }
        },
    )
}

/// One page of the moderation queue
pub fn admin_items(api: &Api, query: AdminItemsQuery) -> Query<AdminItemsResponse> {
    let api = api.clone();
    Query::new(admin_items_key(&query), QueryOptions::default(), move || {
        let api = api.clone();
        let query = query.clone();
        async move { api.admin_items(&query).await }
    })
}

pub fn admin_users(api: &Api, query: AdminUsersQuery) -> Query<AdminUsersResponse> {
    let api = api.clone();
    Query::new(
        QueryKey::from_params(ResourceKind::AdminUsers, &query),
        QueryOptions::default(),
        move || {
            let api = api.clone();
            let query = query.clone();
            async move { api.admin_users(&query).await }
        },
    )
}

pub fn admin_reports(api: &Api, query: ReportsQuery) -> Query<ReportResponse> {
    let api = api.clone();
    Query::new(
        QueryKey::from_params(ResourceKind::AdminReports, &query),
        QueryOptions::default(),
        move || {
            let api = api.clone();
            async move { api.admin_reports(&query).await }
        },
    )
}
