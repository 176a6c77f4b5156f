//! # Test Support
//!
//! An in-memory marketplace implementing [`MarketplaceApi`] that records every
//! call, plus builders for users, items and swaps.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use shared::{
    ActivityResponse, AdminDashboardResponse, AdminItemsQuery, AdminItemsResponse,
    AdminUsersQuery, AdminUsersResponse, AuthResponse, CancelRequest, ChangePasswordRequest,
    CreateSwapRequest, ImageUpload, Item, ItemFilters, ItemMutationResponse, ItemResponse,
    ItemsResponse, LikeResponse, LoginRequest, MessageResponse, ModerationStatus, NewItemFields,
    PublicProfileResponse, RateSwapRequest, RedeemOwnerResponse, RegisterRequest,
    RejectItemRequest, ReportResponse, ReportsQuery, RespondAction, RespondRequest, Swap,
    SwapMutationResponse, SwapResponse, SwapStatus, SwapsResponse, UpdateItemRequest,
    UpdatePointsRequest, UpdateProfileRequest, UpdateRoleRequest, UserItemsQuery,
    UserListResponse, UserProfile, UserResponse, UserStatsResponse,
};

use client::app::App;
use client::core::error::ApiError;
use client::core::service::MarketplaceApi;
use client::session::{MemorySessionStorage, PersistedSession};

/// One recorded API call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: &'static str,
    /// Path parameter (id, username) or empty
    pub target: String,
    pub body: Value,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    items: Vec<Item>,
    swaps: Vec<Swap>,
    user: Option<UserProfile>,
    acting_as: Option<String>,
    failures: HashMap<&'static str, ApiError>,
    category_delays: HashMap<String, Duration>,
    next_id: u32,
}

/// Recording in-memory backend
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_item(&self, item: Item) {
        self.state.lock().items.push(item);
    }

    pub fn add_swap(&self, swap: Swap) {
        self.state.lock().swaps.push(swap);
    }

    /// User returned by login, register and `/auth/me`
    pub fn set_user(&self, user: UserProfile) {
        self.state.lock().user = Some(user);
    }

    /// Identity used as requester of created swaps
    pub fn act_as(&self, user_id: &str) {
        self.state.lock().acting_as = Some(user_id.to_string());
    }

    /// Make every call of `name` fail with `error`
    pub fn fail(&self, name: &'static str, error: ApiError) {
        self.state.lock().failures.insert(name, error);
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Delay listing responses filtered by `category`
    pub fn delay_category(&self, category: &str, delay: Duration) {
        self.state
            .lock()
            .category_delays
            .insert(category.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn calls_named(&self, name: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.name == name).collect()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls_named(name).len()
    }

    pub fn item(&self, id: &str) -> Option<Item> {
        self.state.lock().items.iter().find(|i| i.id == id).cloned()
    }

    pub fn swap(&self, id: &str) -> Option<Swap> {
        self.state.lock().swaps.iter().find(|s| s.id == id).cloned()
    }

    fn record(&self, name: &'static str, target: &str, body: Value) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call {
            name,
            target: target.to_string(),
            body,
        });
        match state.failures.get(name) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn with_item<T>(&self, id: &str, f: impl FnOnce(&mut Item) -> T) -> Result<T, ApiError> {
        let mut state = self.state.lock();
        state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .map(f)
            .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))
    }

    fn with_swap<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Swap) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut state = self.state.lock();
        let swap = state
            .swaps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::NotFound("Swap not found".to_string()))?;
        f(swap)
    }

    fn configured_user(&self) -> Result<UserProfile, ApiError> {
        self.state.lock().user.clone().ok_or(ApiError::Unauthorized)
    }

    fn move_swap(
        swap: &mut Swap,
        from: &[SwapStatus],
        to: SwapStatus,
    ) -> Result<SwapMutationResponse, ApiError> {
        if !from.contains(&swap.status) {
            return Err(ApiError::Server {
                status: 400,
                message: Some(format!("Swap is already {}", swap.status)),
            });
        }
        swap.status = to;
        Ok(SwapMutationResponse {
            message: format!("Swap {}", to),
            swap: Some(swap.clone()),
        })
    }
}

fn body<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn listed(item: &Item) -> bool {
    item.is_available && item.is_approved
}

#[async_trait]
impl MarketplaceApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.record("login", "", json!({ "email": request.email }))?;
        Ok(AuthResponse {
            token: format!("token-{}", request.email),
            user: self.configured_user()?,
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record("register", "", json!({ "username": request.username }))?;
        Ok(AuthResponse {
            token: format!("token-{}", request.email),
            user: self.configured_user()?,
        })
    }

    async fn current_user(&self) -> Result<UserResponse, ApiError> {
        self.record("current_user", "", Value::Null)?;
        Ok(UserResponse {
            user: self.configured_user()?,
        })
    }

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<UserResponse, ApiError> {
        self.record("update_profile", "", body(request))?;
        let mut user = self.configured_user()?;
        if let Some(bio) = &request.bio {
            user.bio = Some(bio.clone());
        }
        Ok(UserResponse { user })
    }

    async fn upload_avatar(&self, image: ImageUpload) -> Result<UserResponse, ApiError> {
        self.record("upload_avatar", &image.file_name, Value::Null)?;
        Ok(UserResponse {
            user: self.configured_user()?,
        })
    }

    async fn change_password(
        &self,
        _request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record("change_password", "", Value::Null)?;
        Ok(MessageResponse::default())
    }

    async fn list_items(&self, filters: &ItemFilters) -> Result<ItemsResponse, ApiError> {
        self.record("list_items", "", body(filters))?;

        let delay = filters.category.and_then(|category| {
            self.state
                .lock()
                .category_delays
                .get(category.as_str())
                .copied()
        });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let items = self
            .state
            .lock()
            .items
            .iter()
            .filter(|item| listed(item))
            .filter(|item| filters.category.is_none() || item.category == filters.category)
            .filter(|item| {
                filters
                    .search
                    .as_deref()
                    .map_or(true, |search| item.title.contains(search))
            })
            .cloned()
            .collect();
        Ok(ItemsResponse {
            items,
            pagination: None,
        })
    }

    async fn featured_items(&self) -> Result<ItemsResponse, ApiError> {
        self.record("featured_items", "", Value::Null)?;
        Ok(ItemsResponse::default())
    }

    async fn get_item(&self, id: &str) -> Result<ItemResponse, ApiError> {
        self.record("get_item", id, Value::Null)?;
        let item = self.with_item(id, |item| item.clone())?;
        Ok(ItemResponse { item })
    }

    async fn create_item(
        &self,
        fields: &NewItemFields,
        images: Vec<ImageUpload>,
    ) -> Result<ItemMutationResponse, ApiError> {
        let mut recorded = body(fields);
        recorded["images"] = json!(images.len());
        self.record("create_item", "", recorded)?;

        let owner = self.state.lock().acting_as.clone().unwrap_or_default();
        let mut state = self.state.lock();
        state.next_id += 1;
        let item = item_json(&format!("new-{}", state.next_id), &owner, fields.points_value)
            .with_title(&fields.title)
            .pending()
            .build();
        state.items.push(item.clone());
        Ok(ItemMutationResponse {
            message: "Item created successfully".to_string(),
            item: Some(item),
        })
    }

    async fn update_item(
        &self,
        id: &str,
        request: &UpdateItemRequest,
    ) -> Result<ItemMutationResponse, ApiError> {
        self.record("update_item", id, body(request))?;
        let item = self.with_item(id, |item| {
            if let Some(title) = &request.title {
                item.title = title.clone();
            }
            item.clone()
        })?;
        Ok(ItemMutationResponse {
            message: "Item updated".to_string(),
            item: Some(item),
        })
    }

    async fn delete_item(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.record("delete_item", id, Value::Null)?;
        self.state.lock().items.retain(|i| i.id != id);
        Ok(MessageResponse::default())
    }

    async fn toggle_like(&self, id: &str) -> Result<LikeResponse, ApiError> {
        self.record("toggle_like", id, Value::Null)?;
        self.with_item(id, |item| {
            item.is_liked = !item.is_liked;
            item.likes_count = if item.is_liked {
                item.likes_count + 1
            } else {
                item.likes_count.saturating_sub(1)
            };
            LikeResponse {
                is_liked: item.is_liked,
                likes_count: item.likes_count,
            }
        })
    }

    async fn user_items(
        &self,
        user_id: &str,
        query: &UserItemsQuery,
    ) -> Result<ItemsResponse, ApiError> {
        self.record("user_items", user_id, body(query))?;
        let items = self
            .state
            .lock()
            .items
            .iter()
            .filter(|item| item.is_owned_by(user_id))
            .filter(|item| query.is_available.map_or(true, |v| item.is_available == v))
            .filter(|item| query.is_approved.map_or(true, |v| item.is_approved == v))
            .cloned()
            .collect();
        Ok(ItemsResponse {
            items,
            pagination: None,
        })
    }

    async fn mark_unavailable(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.record("mark_unavailable", id, Value::Null)?;
        self.with_item(id, |item| item.is_available = false)?;
        Ok(MessageResponse {
            message: "Item marked as unavailable".to_string(),
        })
    }

    async fn redeem_by_owner(&self, id: &str) -> Result<RedeemOwnerResponse, ApiError> {
        self.record("redeem_by_owner", id, Value::Null)?;
        let points = self.with_item(id, |item| {
            item.is_available = false;
            item.points_value
        })?;
        Ok(RedeemOwnerResponse {
            message: "Item redeemed".to_string(),
            points_deducted: Some(points),
            remaining_points: None,
        })
    }

    async fn create_swap(
        &self,
        request: &CreateSwapRequest,
    ) -> Result<SwapMutationResponse, ApiError> {
        self.record("create_swap", &request.requested_item, body(request))?;

        let mut state = self.state.lock();
        let owner = state
            .items
            .iter()
            .find(|i| i.id == request.requested_item)
            .and_then(|i| i.owner_id().map(str::to_string))
            .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;
        state.next_id += 1;

        let mut swap = json!({
            "_id": format!("swap-{}", state.next_id),
            "requestedItem": {"_id": request.requested_item, "owner": owner},
            "requester": state.acting_as.clone().unwrap_or_default(),
            "message": request.message,
            "status": "pending",
        });
        if let (Some(swap), Value::Object(offer)) = (swap.as_object_mut(), body(&request.offer)) {
            swap.extend(offer);
        }
        let swap: Swap =
            serde_json::from_value(swap).map_err(|e| ApiError::Decode(e.to_string()))?;
        state.swaps.push(swap.clone());

        Ok(SwapMutationResponse {
            message: "Swap request created successfully".to_string(),
            swap: Some(swap),
        })
    }

    async fn list_swaps(&self) -> Result<SwapsResponse, ApiError> {
        self.record("list_swaps", "", Value::Null)?;
        Ok(SwapsResponse {
            swaps: self.state.lock().swaps.clone(),
        })
    }

    async fn get_swap(&self, id: &str) -> Result<SwapResponse, ApiError> {
        self.record("get_swap", id, Value::Null)?;
        let swap = self.with_swap(id, |swap| Ok(swap.clone()))?;
        Ok(SwapResponse { swap })
    }

    async fn respond_swap(
        &self,
        id: &str,
        request: &RespondRequest,
    ) -> Result<SwapMutationResponse, ApiError> {
        self.record("respond_swap", id, body(request))?;
        let to = match request.action {
            RespondAction::Accept => SwapStatus::Accepted,
            RespondAction::Reject => SwapStatus::Rejected,
        };
        self.with_swap(id, |swap| FakeApi::move_swap(swap, &[SwapStatus::Pending], to))
    }

    async fn complete_swap(&self, id: &str) -> Result<SwapMutationResponse, ApiError> {
        self.record("complete_swap", id, Value::Null)?;
        self.with_swap(id, |swap| {
            FakeApi::move_swap(swap, &[SwapStatus::Accepted], SwapStatus::Completed)
        })
    }

    async fn cancel_swap(
        &self,
        id: &str,
        request: &CancelRequest,
    ) -> Result<SwapMutationResponse, ApiError> {
        self.record("cancel_swap", id, body(request))?;
        self.with_swap(id, |swap| {
            FakeApi::move_swap(
                swap,
                &[SwapStatus::Pending, SwapStatus::Accepted],
                SwapStatus::Cancelled,
            )
        })
    }

    async fn rate_swap(
        &self,
        id: &str,
        request: &RateSwapRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record("rate_swap", id, body(request))?;
        Ok(MessageResponse::default())
    }

    async fn public_profile(&self, username: &str) -> Result<PublicProfileResponse, ApiError> {
        self.record("public_profile", username, Value::Null)?;
        Err(ApiError::NotFound("User not found".to_string()))
    }

    async fn search_users(&self, query: &str) -> Result<UserListResponse, ApiError> {
        self.record("search_users", query, Value::Null)?;
        Ok(UserListResponse::default())
    }

    async fn top_users(&self, limit: u32) -> Result<UserListResponse, ApiError> {
        self.record("top_users", "", json!({ "limit": limit }))?;
        Ok(UserListResponse::default())
    }

    async fn user_stats(&self) -> Result<UserStatsResponse, ApiError> {
        self.record("user_stats", "", Value::Null)?;
        Ok(UserStatsResponse::default())
    }

    async fn user_activity(&self, limit: u32) -> Result<ActivityResponse, ApiError> {
        self.record("user_activity", "", json!({ "limit": limit }))?;
        Ok(ActivityResponse::default())
    }

    async fn admin_dashboard(&self) -> Result<AdminDashboardResponse, ApiError> {
        self.record("admin_dashboard", "", Value::Null)?;
        Ok(AdminDashboardResponse::default())
    }

    async fn admin_items(&self, query: &AdminItemsQuery) -> Result<AdminItemsResponse, ApiError> {
        self.record("admin_items", "", body(query))?;
        let items = self
            .state
            .lock()
            .items
            .iter()
            .filter(|item| match query.status {
                ModerationStatus::Pending => !item.is_approved && !item.is_rejected,
                ModerationStatus::Approved => item.is_approved,
                ModerationStatus::Rejected => item.is_rejected,
                ModerationStatus::All => true,
            })
            .cloned()
            .collect();
        Ok(AdminItemsResponse {
            items,
            pagination: None,
        })
    }

    async fn approve_item(&self, id: &str) -> Result<ItemMutationResponse, ApiError> {
        self.record("approve_item", id, Value::Null)?;
        let item = self.with_item(id, |item| {
            item.is_approved = true;
            item.is_rejected = false;
            item.clone()
        })?;
        Ok(ItemMutationResponse {
            message: "Item approved".to_string(),
            item: Some(item),
        })
    }

    async fn reject_item(
        &self,
        id: &str,
        request: &RejectItemRequest,
    ) -> Result<ItemMutationResponse, ApiError> {
        self.record("reject_item", id, body(request))?;
        let item = self.with_item(id, |item| {
            item.is_approved = false;
            item.is_rejected = true;
            item.rejection_reason = Some(request.reason.clone());
            item.clone()
        })?;
        Ok(ItemMutationResponse {
            message: "Item rejected".to_string(),
            item: Some(item),
        })
    }

    async fn admin_delete_item(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.record("admin_delete_item", id, Value::Null)?;
        self.state.lock().items.retain(|i| i.id != id);
        Ok(MessageResponse::default())
    }

    async fn admin_users(&self, query: &AdminUsersQuery) -> Result<AdminUsersResponse, ApiError> {
        self.record("admin_users", "", body(query))?;
        Ok(AdminUsersResponse::default())
    }

    async fn update_user_role(
        &self,
        id: &str,
        request: &UpdateRoleRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record("update_user_role", id, body(request))?;
        Ok(MessageResponse::default())
    }

    async fn update_user_points(
        &self,
        id: &str,
        request: &UpdatePointsRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record("update_user_points", id, body(request))?;
        Ok(MessageResponse::default())
    }

    async fn admin_reports(&self, query: &ReportsQuery) -> Result<ReportResponse, ApiError> {
        self.record("admin_reports", "", body(query))?;
        Ok(ReportResponse::default())
    }

    async fn health(&self) -> Result<Value, ApiError> {
        self.record("health", "", Value::Null)?;
        Ok(json!({ "status": "ok" }))
    }
}

// ----- Builders -----

pub fn user(id: &str, points: i64) -> UserProfile {
    serde_json::from_value(json!({
        "_id": id,
        "username": id,
        "email": format!("{}@example.com", id),
        "points": points,
    }))
    .expect("user fixture should parse")
}

pub fn admin(id: &str) -> UserProfile {
    serde_json::from_value(json!({
        "_id": id,
        "username": id,
        "email": format!("{}@example.com", id),
        "role": "admin",
    }))
    .expect("admin fixture should parse")
}

/// Item fixture builder over its wire JSON
pub struct ItemJson(Value);

pub fn item_json(id: &str, owner: &str, points: i64) -> ItemJson {
    ItemJson(json!({
        "_id": id,
        "title": format!("Item {}", id),
        "description": "Gently worn",
        "category": "tops",
        "size": "M",
        "condition": "good",
        "pointsValue": points,
        "owner": {"_id": owner, "username": owner},
        "isAvailable": true,
        "isApproved": true,
        "isRejected": false,
        "likesCount": 0,
    }))
}

impl ItemJson {
    pub fn with_title(mut self, title: &str) -> Self {
        self.0["title"] = json!(title);
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.0["category"] = json!(category);
        self
    }

    pub fn pending(mut self) -> Self {
        self.0["isApproved"] = json!(false);
        self
    }

    pub fn build(self) -> Item {
        serde_json::from_value(self.0).expect("item fixture should parse")
    }
}

/// Listed item: available and approved
pub fn item(id: &str, owner: &str, points: i64) -> Item {
    item_json(id, owner, points).build()
}

pub fn swap(id: &str, item_id: &str, owner: &str, requester: &str, status: SwapStatus) -> Swap {
    serde_json::from_value(json!({
        "_id": id,
        "requestedItem": {"_id": item_id, "owner": owner},
        "requester": requester,
        "swapType": "points",
        "pointsOffered": 100,
        "status": status.as_str(),
    }))
    .expect("swap fixture should parse")
}

/// App whose session is already logged in as `user`, or logged out
pub fn app_as(api: &Arc<FakeApi>, user: Option<UserProfile>) -> App {
    if let Some(user) = &user {
        api.act_as(&user.id);
    }
    let storage = match user {
        Some(user) => MemorySessionStorage::with_session(PersistedSession {
            user: Some(user),
            token: Some("test-token".to_string()),
            is_authenticated: true,
        }),
        None => MemorySessionStorage::new(),
    };
    App::with_api(api.clone(), Arc::new(storage))
}

pub fn image(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}
