use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserRef;

/// Clothing category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
    #[serde(other)]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Dresses => "dresses",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
            Category::Other => "other",
        }
    }
}

/// Garment size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Size {
    #[serde(rename = "XS")]
    ExtraSmall,
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "XL")]
    ExtraLarge,
    #[serde(rename = "XXL")]
    DoubleExtraLarge,
    #[serde(rename = "One Size")]
    OneSize,
}

impl Size {
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::ExtraSmall => "XS",
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
            Size::ExtraLarge => "XL",
            Size::DoubleExtraLarge => "XXL",
            Size::OneSize => "One Size",
        }
    }
}

/// Wear condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }
}

/// Image attached to an item
///
/// Older listings carry a direct `url`; newer ones store the bytes in the backend
/// and must be fetched through `/images/item/:id?index=N`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ImageRef {
    Url {
        url: String,
    },
    Binary {
        data: serde_json::Value,
        #[serde(default, rename = "contentType")]
        content_type: Option<String>,
    },
    Unknown(serde_json::Value),
}

/// A listed clothing article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub points_value: i64,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_rejected: bool,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn owner_id(&self) -> Option<&str> {
        self.owner.as_ref().map(UserRef::id)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id() == Some(user_id)
    }

    /// Available and approved: the only state in which swaps and redemptions are offered
    pub fn is_exchangeable(&self) -> bool {
        self.is_available && self.is_approved && !self.is_rejected
    }
}

/// Reference to an item: a bare id or a populated item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ItemRef {
    Id(String),
    Populated(Box<Item>),
}

impl ItemRef {
    pub fn id(&self) -> &str {
        match self {
            ItemRef::Id(id) => id,
            ItemRef::Populated(item) => &item.id,
        }
    }

    pub fn item(&self) -> Option<&Item> {
        match self {
            ItemRef::Id(_) => None,
            ItemRef::Populated(item) => Some(item),
        }
    }
}

/// Listing sort field
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    PointsValue,
    Views,
    Title,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query parameters for `GET /items`
///
/// Also used as the parameter set of the item-listing cache key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<i64>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page: u32,
}

impl Default for ItemFilters {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            size: None,
            condition: None,
            min_points: None,
            max_points: None,
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
        }
    }
}

impl ItemFilters {
    /// True when any narrowing filter (not sort or page) is set
    pub fn has_active_filters(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.category.is_some()
            || self.size.is_some()
            || self.condition.is_some()
            || self.min_points.is_some()
            || self.max_points.is_some()
    }
}

/// Pagination block of list responses
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// `GET /items` and friends
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// `GET /items/:id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemResponse {
    pub item: Item,
}

/// Body of item mutations (create, update, moderation)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ItemMutationResponse {
    pub message: String,
    pub item: Option<Item>,
}

/// Image file to upload with a new listing or as an avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Text fields of a new listing, sent as multipart parts next to the images
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewItemFields {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub size: Size,
    pub condition: Condition,
    pub points_value: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Owner edits to an existing listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Query parameters for `GET /items/user/:userId`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct UserItemsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
}

/// `POST /items/:id/like`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LikeResponse {
    pub is_liked: bool,
    pub likes_count: u64,
}

/// `POST /items/:id/redeem-owner`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RedeemOwnerResponse {
    pub message: String,
    pub points_deducted: Option<i64>,
    pub remaining_points: Option<i64>,
}
