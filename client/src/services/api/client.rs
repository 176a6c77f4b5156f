//! # API Client
//!
//! The single chokepoint for backend communication.
//!
//! Every request goes through [`ApiClient::request`], which:
//! - attaches `Authorization: Bearer <token>` when the session holds a token
//! - enforces the uniform request timeout
//! - unwraps `{ "data": ... }` envelopes so callers see one canonical payload
//! - applies [`failure_policy`] to every failure: forced logout on 401, a toast for
//!   anything else except 404s and `/admin/` requests
//!
//! The failure is still returned to the caller afterwards, so the initiating
//! operation can stop its own loading state.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{multipart::Form, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use shared::{
    ActivityResponse, AdminDashboardResponse, AdminItemsQuery, AdminItemsResponse,
    AdminUsersQuery, AdminUsersResponse, AuthResponse, CancelRequest, ChangePasswordRequest,
    CreateSwapRequest, ErrorResponse, ImageUpload, ItemFilters, ItemMutationResponse,
    ItemResponse, ItemsResponse, LikeResponse, LoginRequest, MessageResponse, NewItemFields,
    PublicProfileResponse, RateSwapRequest, RedeemOwnerResponse, RegisterRequest,
    RejectItemRequest, ReportResponse, ReportsQuery, RespondRequest, SwapMutationResponse,
    SwapResponse, SwapsResponse, UpdateItemRequest, UpdatePointsRequest, UpdateProfileRequest,
    UpdateRoleRequest, UserItemsQuery, UserListResponse, UserResponse, UserStatsResponse,
};
use uuid::Uuid;

use super::{admin, auth, items, swaps, users};

use crate::app::routes::Route;
use crate::config::ClientConfig;
use crate::core::error::{ApiError, AppError};
use crate::core::service::MarketplaceApi;
use crate::services::notifications::Notifier;
use crate::session::SessionStore;

/// What the gateway does about a failed request, besides returning the error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureAction {
    /// Log the session out and send the user to the login page
    ForceLogout,
    /// Show an error toast with this message
    Toast(String),
    /// Say nothing; the caller renders its own state
    Silent,
}

/// Global error policy
///
/// `path` is the request path relative to the API base (e.g. `/admin/items`).
pub fn failure_policy(error: &ApiError, path: &str) -> FailureAction {
    match error {
        ApiError::Unauthorized => FailureAction::ForceLogout,
        ApiError::NotFound(_) => FailureAction::Silent,
        _ if is_admin_path(path) => FailureAction::Silent,
        _ => FailureAction::Toast(error.message()),
    }
}

fn is_admin_path(path: &str) -> bool {
    path.starts_with("/admin/") || path.contains("/admin/")
}

/// Strip a `{ "data": { ... } }` envelope
///
/// Only an object whose keys are `data` plus optional `success`/`message` is treated as
/// an envelope; any other body is returned untouched.
pub fn normalize_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map)
            if map.get("data").is_some_and(Value::is_object)
                && map
                    .keys()
                    .all(|k| matches!(k.as_str(), "data" | "success" | "message")) =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// HTTP client for the ReWear backend
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    session: SessionStore,
    notifier: Notifier,
}

impl ApiClient {
    /// Create a client with the configured base URL and timeout
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        notifier: Notifier,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
            notifier,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the canonical payload
    #[tracing::instrument(
        name = "api_request",
        skip_all,
        fields(method = %method, path = %path, request_id = %Uuid::new_v4())
    )]
    pub(crate) async fn request<T, F>(
        &self,
        method: Method,
        path: &str,
        build: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder + Send,
    {
        let start = Instant::now();

        let mut builder = self.client.request(method, self.url(path));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        let result = match build(builder).send().await {
            Ok(response) => Self::read_response(response).await,
            Err(e) => Err(transport_error(e)),
        };
        let duration = start.elapsed();

        match result {
            Ok(value) => {
                tracing::info!(duration_ms = duration.as_millis(), "Request succeeded");
                serde_json::from_value(normalize_envelope(value)).map_err(|e| {
                    let err = ApiError::Decode(e.to_string());
                    tracing::error!(error = %e, "Response parse error");
                    self.apply_failure_policy(&err, path);
                    err
                })
            }
            Err(err) => {
                tracing::warn!(
                    status = ?err.status(),
                    error = %err,
                    duration_ms = duration.as_millis(),
                    "Request failed"
                );
                self.apply_failure_policy(&err, path);
                Err(err)
            }
        }
    }

    async fn read_response(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if status.is_success() {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Object(Map::new()));
            }
            return serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()));
        }

        let message = serde_json::from_slice::<ErrorResponse>(&bytes)
            .ok()
            .and_then(|body| body.message);

        Err(match status.as_u16() {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(message.unwrap_or_default()),
            code => ApiError::Server {
                status: code,
                message,
            },
        })
    }

    fn apply_failure_policy(&self, error: &ApiError, path: &str) {
        match failure_policy(error, path) {
            FailureAction::ForceLogout => {
                tracing::warn!(path = %path, "Authentication rejected, forcing logout");
                self.session.logout();
                self.notifier.navigate(Route::Login);
            }
            FailureAction::Toast(message) => self.notifier.error(message),
            FailureAction::Silent => {
                tracing::debug!(path = %path, error = %error, "Error toast suppressed");
            }
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, |rb| rb).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync + ?Sized,
    {
        self.request(Method::GET, path, |rb| rb.query(query)).await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.request(Method::POST, path, |rb| rb.json(body)).await
    }

    pub(crate) async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.request(Method::PUT, path, |rb| rb.json(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, |rb| rb).await
    }

    pub(crate) async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::PUT, path, |rb| rb).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, |rb| rb).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, |rb| rb.multipart(form)).await
    }
}

#[async_trait]
impl MarketplaceApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        auth::login(self, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        auth::register(self, request).await
    }

    async fn current_user(&self) -> Result<UserResponse, ApiError> {
        auth::current_user(self).await
    }

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<UserResponse, ApiError> {
        auth::update_profile(self, request).await
    }

    async fn upload_avatar(&self, image: ImageUpload) -> Result<UserResponse, ApiError> {
        auth::upload_avatar(self, image).await
    }

    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        auth::change_password(self, request).await
    }

    async fn list_items(&self, filters: &ItemFilters) -> Result<ItemsResponse, ApiError> {
        items::list_items(self, filters).await
    }

    async fn featured_items(&self) -> Result<ItemsResponse, ApiError> {
        items::featured_items(self).await
    }

    async fn get_item(&self, id: &str) -> Result<ItemResponse, ApiError> {
        items::get_item(self, id).await
    }

    async fn create_item(
        &self,
        fields: &NewItemFields,
        images: Vec<ImageUpload>,
    ) -> Result<ItemMutationResponse, ApiError> {
        items::create_item(self, fields, images).await
    }

    async fn update_item(
        &self,
        id: &str,
        request: &UpdateItemRequest,
    ) -> Result<ItemMutationResponse, ApiError> {
        items::update_item(self, id, request).await
    }

    async fn delete_item(&self, id: &str) -> Result<MessageResponse, ApiError> {
        items::delete_item(self, id).await
    }

    async fn toggle_like(&self, id: &str) -> Result<LikeResponse, ApiError> {
        items::toggle_like(self, id).await
    }

    async fn user_items(
        &self,
        user_id: &str,
        query: &UserItemsQuery,
    ) -> Result<ItemsResponse, ApiError> {
        items::user_items(self, user_id, query).await
    }

    async fn mark_unavailable(&self, id: &str) -> Result<MessageResponse, ApiError> {
        items::mark_unavailable(self, id).await
    }

    async fn redeem_by_owner(&self, id: &str) -> Result<RedeemOwnerResponse, ApiError> {
        items::redeem_by_owner(self, id).await
    }

    async fn create_swap(
        &self,
        request: &CreateSwapRequest,
    ) -> Result<SwapMutationResponse, ApiError> {
        swaps::create_swap(self, request).await
    }

    async fn list_swaps(&self) -> Result<SwapsResponse, ApiError> {
        swaps::list_swaps(self).await
    }

    async fn get_swap(&self, id: &str) -> Result<SwapResponse, ApiError> {
        swaps::get_swap(self, id).await
    }

    async fn respond_swap(
        &self,
        id: &str,
        request: &RespondRequest,
    ) -> Result<SwapMutationResponse, ApiError> {
        swaps::respond_swap(self, id, request).await
    }

    async fn complete_swap(&self, id: &str) -> Result<SwapMutationResponse, ApiError> {
        swaps::complete_swap(self, id).await
    }

    async fn cancel_swap(
        &self,
        id: &str,
        request: &CancelRequest,
    ) -> Result<SwapMutationResponse, ApiError> {
        swaps::cancel_swap(self, id, request).await
    }

    async fn rate_swap(
        &self,
        id: &str,
        request: &RateSwapRequest,
    ) -> Result<MessageResponse, ApiError> {
        swaps::rate_swap(self, id, request).await
    }

    async fn public_profile(&self, username: &str) -> Result<PublicProfileResponse, ApiError> {
        users::public_profile(self, username).await
    }

    async fn search_users(&self, query: &str) -> Result<UserListResponse, ApiError> {
        users::search_users(self, query).await
    }

    async fn top_users(&self, limit: u32) -> Result<UserListResponse, ApiError> {
        users::top_users(self, limit).await
    }

    async fn user_stats(&self) -> Result<UserStatsResponse, ApiError> {
        users::user_stats(self).await
    }

    async fn user_activity(&self, limit: u32) -> Result<ActivityResponse, ApiError> {
        users::user_activity(self, limit).await
    }

    async fn admin_dashboard(&self) -> Result<AdminDashboardResponse, ApiError> {
        admin::dashboard(self).await
    }

    async fn admin_items(&self, query: &AdminItemsQuery) -> Result<AdminItemsResponse, ApiError> {
        admin::items(self, query).await
    }

    async fn approve_item(&self, id: &str) -> Result<ItemMutationResponse, ApiError> {
        admin::approve_item(self, id).await
    }

    async fn reject_item(
        &self,
        id: &str,
        request: &RejectItemRequest,
    ) -> Result<ItemMutationResponse, ApiError> {
        admin::reject_item(self, id, request).await
    }

    async fn admin_delete_item(&self, id: &str) -> Result<MessageResponse, ApiError> {
        admin::delete_item(self, id).await
    }

    async fn admin_users(&self, query: &AdminUsersQuery) -> Result<AdminUsersResponse, ApiError> {
        admin::users(self, query).await
    }

    async fn update_user_role(
        &self,
        id: &str,
        request: &UpdateRoleRequest,
    ) -> Result<MessageResponse, ApiError> {
        admin::update_user_role(self, id, request).await
    }

    async fn update_user_points(
        &self,
        id: &str,
        request: &UpdatePointsRequest,
    ) -> Result<MessageResponse, ApiError> {
        admin::update_user_points(self, id, request).await
    }

    async fn admin_reports(&self, query: &ReportsQuery) -> Result<ReportResponse, ApiError> {
        admin::reports(self, query).await
    }

    async fn health(&self) -> Result<Value, ApiError> {
        self.get("/health").await
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}
