use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Avatar reference: either a direct URL or an opaque binary blob served by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AvatarRef {
    Url(String),
    Binary {
        data: serde_json::Value,
        #[serde(default, rename = "contentType")]
        content_type: Option<String>,
    },
}

/// Full user profile as returned by `/auth/*` endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarRef>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// "First Last", falling back to the username when no name is set
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Merge a partial stats update into this snapshot
    pub fn apply_patch(&mut self, patch: &UserStatsPatch) {
        if let Some(points) = patch.points {
            self.points = points;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(reviews_count) = patch.reviews_count {
            self.reviews_count = reviews_count;
        }
    }
}

/// Partial update of the locally cached user snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u32>,
}

/// Lightweight user embedded in items and swaps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarRef>,
    #[serde(default)]
    pub rating: f64,
}

/// Reference to a user: a bare id or a populated summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Populated(Box<UserSummary>),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::Populated(user) => &user.id,
        }
    }

    pub fn summary(&self) -> Option<&UserSummary> {
        match self {
            UserRef::Id(_) => None,
            UserRef::Populated(user) => Some(user),
        }
    }
}

/// Item counters on the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ItemCounts {
    pub total: u64,
    pub available: u64,
}

/// Swap counters on the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwapCounts {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

/// Dashboard statistics for the current user (`GET /users/stats`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStats {
    pub items: ItemCounts,
    pub swaps: SwapCounts,
    pub points: i64,
    pub rating: f64,
    pub reviews_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserStatsResponse {
    #[serde(default)]
    pub stats: UserStats,
}

/// One entry of the recent-activity feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityResponse {
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Public profile of another user (`GET /users/profile/:username`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicProfileResponse {
    pub user: UserSummary,
}

/// Search and leaderboard results
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ref_accepts_id_or_object() {
        let bare: UserRef = serde_json::from_str(r#""u1""#).unwrap();
        assert_eq!(bare.id(), "u1");

        let populated: UserRef =
            serde_json::from_str(r#"{"_id":"u2","username":"mara","rating":4.5}"#).unwrap();
        assert_eq!(populated.id(), "u2");
        assert_eq!(populated.summary().map(|u| u.username.as_str()), Some("mara"));
    }

    #[test]
    fn test_profile_defaults_missing_counters() {
        let user: UserProfile =
            serde_json::from_str(r#"{"_id":"u1","username":"ada","email":"a@b.co"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.points, 0);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_apply_patch_only_touches_given_fields() {
        let mut user: UserProfile = serde_json::from_str(
            r#"{"_id":"u1","username":"ada","points":150,"rating":4.0,"reviewsCount":3}"#,
        )
        .unwrap();

        user.apply_patch(&UserStatsPatch {
            points: Some(50),
            ..Default::default()
        });

        assert_eq!(user.points, 50);
        assert_eq!(user.rating, 4.0);
        assert_eq!(user.reviews_count, 3);
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user: UserProfile = serde_json::from_str(r#"{"_id":"u1","username":"ada"}"#).unwrap();
        assert_eq!(user.display_name(), "ada");
    }

    #[test]
    fn test_stats_parse_nested_counters() {
        let stats: UserStatsResponse = serde_json::from_str(
            r#"{"stats":{"items":{"total":4,"available":2},"swaps":{"total":3,"completed":1,"pending":2},"points":120}}"#,
        )
        .unwrap();
        assert_eq!(stats.stats.items.available, 2);
        assert_eq!(stats.stats.swaps.pending, 2);
        assert_eq!(stats.stats.points, 120);
    }
}
