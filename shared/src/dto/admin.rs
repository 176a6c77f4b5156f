use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{Item, Pagination};
use super::user::Role;

/// Moderation queue filter for `GET /admin/items`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AdminItemsQuery {
    pub status: ModerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for AdminItemsQuery {
    fn default() -> Self {
        Self {
            status: ModerationStatus::Pending,
            search: None,
            page: 1,
            limit: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AdminUsersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for AdminUsersQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            limit: 20,
        }
    }
}

/// `PUT /admin/items/:id/reject`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectItemRequest {
    pub reason: String,
}

/// `PUT /admin/users/:id/role`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// `PUT /admin/users/:id/points`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePointsRequest {
    pub points: i64,
}

/// Moderation queue page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminItemsResponse {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// User row in the admin user table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub items_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminUsersResponse {
    #[serde(default)]
    pub users: Vec<AdminUser>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Headline numbers of the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_users: u64,
    pub total_items: u64,
    pub pending_items: u64,
    pub total_swaps: u64,
    pub completed_swaps: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminDashboardResponse {
    #[serde(default)]
    pub stats: AdminDashboard,
}

/// Subject of an aggregate report
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Items,
    Users,
    Swaps,
}

/// Time window of an aggregate report
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

/// `GET /admin/reports?type=&period=`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReportsQuery {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub period: ReportPeriod,
}

/// Aggregate counters; which ones are filled depends on the report type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Report {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub new: u64,
    pub active: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportResponse {
    #[serde(default)]
    pub report: Report,
}
