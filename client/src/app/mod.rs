//! # Application Root
//!
//! [`App`] owns the shared pieces of the client and is the surface a front end
//! drives: it reads queries, invokes mutations and drains [`AppEvent`]s.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Front end (desktop, terminal, CLI)                      │
//! │   - App::guard(route)        - App::items(filters) ...   │
//! │   - App::request_swap(...)   - App::drain_events()       │
//! └────────────┬─────────────────────────────▲───────────────┘
//!              │                             │ async_channel
//! ┌────────────▼─────────────────────────────┴───────────────┐
//! │  AppContext                                              │
//! │   SessionStore   who is logged in (persisted)            │
//! │   QueryCache     remote data, dedup + invalidation       │
//! │   Notifier       toasts and navigation                   │
//! │   MarketplaceApi ApiClient in production, fakes in tests │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//!
//! Handlers finish their cache invalidation before emitting toasts or
//! navigation, so the page navigated to never reads a result marked fresh from
//! before the mutation.
//!
//! ## Related Modules
//!
//! - [`events`]: Toast and navigation events
//! - [`routes`]: Page table and guards
//! - [`lifecycle`]: Swap state machine
//! - [`permissions`]: Item action visibility and swap list partitioning
//! - [`queries`]: Query constructors per resource
//! - [`handlers`]: Mutations by domain

pub mod events;
pub mod handlers;
pub mod lifecycle;
pub mod permissions;
pub mod queries;
pub mod routes;

use std::sync::Arc;

use async_channel::Receiver;
use shared::{
    AdminItemsQuery, ImageUpload, Item, ItemFilters, ItemMutationResponse, ItemResponse,
    ItemsResponse, LikeResponse, LoginRequest, NewItemFields, RegisterRequest, RespondAction,
    Role, Swap, SwapMutationResponse, SwapResponse, SwapsResponse, UserProfile,
};

pub use events::{AppEvent, ToastLevel};
pub use handlers::swap::{SwapRequestForm, SwapRequestOutcome};
pub use lifecycle::{SwapAction, SwapControls, SwapRole};
pub use permissions::{ItemActions, SwapIntent, SwapLists};
pub use routes::{guard, Access, GuardOutcome, Route};

use crate::cache::{Query, QueryCache, QueryView, ResourceKind};
use crate::config::ClientConfig;
use crate::core::error::{AppError, Result};
use crate::core::service::MarketplaceApi;
use crate::services::api::ApiClient;
use crate::services::notifications::{self, Notifier};
use crate::session::{AuthService, FileSessionStorage, SessionPersistence, SessionStore};

/// Shared handles every handler works with
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn MarketplaceApi>,
    pub session: SessionStore,
    pub cache: QueryCache,
    pub notifier: Notifier,
}

impl AppContext {
    pub(crate) fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    pub(crate) fn invalidate_all(&self, kinds: &[ResourceKind]) {
        for kind in kinds {
            self.cache.invalidate(*kind);
        }
    }
}

/// Marketplace client application
pub struct App {
    ctx: AppContext,
    auth: AuthService,
    events: Receiver<AppEvent>,
}

impl App {
    /// Wire the production client: file-backed session and HTTP gateway
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let (notifier, events) = Notifier::channel();
        let storage = Arc::new(FileSessionStorage::new(config.session_file.clone()));
        let session = SessionStore::new(storage, notifier.clone());
        let api = ApiClient::new(config, session.clone(), notifier.clone())?;

        tracing::info!(api_url = %api.base_url(), "App created");
        Ok(Self::with_parts(Arc::new(api), session, notifier, events))
    }

    /// Assemble an app from prebuilt parts
    ///
    /// `session` and the API must report to `notifier`, whose receiving end is
    /// `events`.
    pub fn with_parts(
        api: Arc<dyn MarketplaceApi>,
        session: SessionStore,
        notifier: Notifier,
        events: Receiver<AppEvent>,
    ) -> Self {
        let auth = AuthService::new(api.clone(), session.clone(), notifier.clone());
        Self {
            ctx: AppContext {
                api,
                session,
                cache: QueryCache::new(),
                notifier,
            },
            auth,
            events,
        }
    }

    /// App over any API implementation with the given session storage
    pub fn with_api(api: Arc<dyn MarketplaceApi>, storage: Arc<dyn SessionPersistence>) -> Self {
        let (notifier, events) = Notifier::channel();
        let session = SessionStore::new(storage, notifier.clone());
        Self::with_parts(api, session, notifier, events)
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn api(&self) -> &Arc<dyn MarketplaceApi> {
        &self.ctx.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.ctx.session
    }

    pub fn cache(&self) -> &QueryCache {
        &self.ctx.cache
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Every event queued since the last call
    pub fn drain_events(&self) -> Vec<AppEvent> {
        notifications::drain(&self.events)
    }

    pub fn events(&self) -> &Receiver<AppEvent> {
        &self.events
    }

    // ----- Session -----

    /// Validate a restored session against the backend
    pub async fn initialize(&self) -> bool {
        let authenticated = self.auth.initialize().await;
        tracing::info!(authenticated, "App initialized");
        authenticated
    }

    pub async fn login(
        &self,
        request: &LoginRequest,
        return_to: Option<Route>,
    ) -> Result<UserProfile> {
        handlers::auth::login(&self.ctx, &self.auth, request, return_to).await
    }

    pub async fn register(
        &self,
        request: &RegisterRequest,
        confirm_password: &str,
    ) -> Result<UserProfile> {
        handlers::auth::register(&self.ctx, &self.auth, request, confirm_password).await
    }

    pub fn logout(&self) {
        handlers::auth::logout(&self.ctx, &self.auth);
    }

    pub fn guard(&self, route: &Route) -> GuardOutcome {
        guard(route, &self.ctx.session.snapshot())
    }

    /// The front end regained focus
    pub fn focus_gained(&self) -> usize {
        self.ctx.cache.focus_gained()
    }

    // ----- Queries -----

    /// A view slot bound to this app's cache
    pub fn view<T>(&self) -> QueryView<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        QueryView::new(self.ctx.cache.clone())
    }

    pub fn items_query(&self, filters: ItemFilters) -> Query<ItemsResponse> {
        queries::items(&self.ctx.api, filters)
    }

    pub fn item_query(&self, id: &str) -> Query<ItemResponse> {
        queries::item(&self.ctx.api, id)
    }

    pub fn swaps_query(&self) -> Query<SwapsResponse> {
        queries::swaps(&self.ctx.api)
    }

    pub fn swap_query(&self, id: &str) -> Query<SwapResponse> {
        queries::swap(&self.ctx.api, id)
    }

    pub async fn items(&self, filters: ItemFilters) -> Result<ItemsResponse> {
        Ok(self.items_query(filters).fetch(&self.ctx.cache).await?)
    }

    pub async fn item(&self, id: &str) -> Result<Item> {
        Ok(self.item_query(id).fetch(&self.ctx.cache).await?.item)
    }

    /// The viewer's swaps, split into received and sent
    pub async fn swap_lists(&self) -> Result<SwapLists> {
        let user_id = self.ctx.session.user_id().ok_or(AppError::NotAuthenticated)?;
        let response = self.swaps_query().fetch(&self.ctx.cache).await?;
        Ok(permissions::partition_swaps(&response.swaps, &user_id))
    }

    pub fn item_actions(&self, item: &Item) -> ItemActions {
        ItemActions::for_viewer(item, self.ctx.session.user().as_ref())
    }

    pub fn swap_controls(&self, swap: &Swap) -> SwapControls {
        SwapControls::for_viewer(swap, self.ctx.session.user_id().as_deref())
    }

    /// Swap dialog defaults for the current user, if logged in
    pub fn swap_form(&self, item: &Item, intent: SwapIntent) -> Option<SwapRequestForm> {
        self.ctx
            .session
            .user()
            .map(|user| SwapRequestForm::new(item, &user, intent))
    }

    // ----- Swaps -----

    pub async fn request_swap(
        &self,
        item: &Item,
        form: &SwapRequestForm,
    ) -> Result<SwapRequestOutcome> {
        handlers::swap::submit_request(&self.ctx, item, form).await
    }

    pub async fn respond_swap(
        &self,
        swap: &Swap,
        action: RespondAction,
        message: Option<String>,
    ) -> Result<SwapMutationResponse> {
        handlers::swap::respond(&self.ctx, swap, action, message).await
    }

    pub async fn complete_swap(&self, swap: &Swap) -> Result<SwapMutationResponse> {
        handlers::swap::complete(&self.ctx, swap).await
    }

    pub async fn cancel_swap(
        &self,
        swap: &Swap,
        reason: Option<String>,
    ) -> Result<SwapMutationResponse> {
        handlers::swap::cancel(&self.ctx, swap, reason).await
    }

    pub async fn rate_swap(&self, swap: &Swap, rating: u8, review: Option<String>) -> Result<()> {
        handlers::swap::rate(&self.ctx, swap, rating, review).await
    }

    // ----- Items -----

    pub async fn create_item(
        &self,
        fields: &NewItemFields,
        images: Vec<ImageUpload>,
    ) -> Result<ItemMutationResponse> {
        handlers::items::create_item(&self.ctx, fields, images).await
    }

    pub async fn toggle_like(&self, item_id: &str) -> Result<LikeResponse> {
        handlers::items::toggle_like(&self.ctx, item_id).await
    }

    pub async fn mark_unavailable(&self, item: &Item) -> Result<()> {
        handlers::items::mark_unavailable(&self.ctx, item).await
    }

    // ----- Admin -----

    pub async fn approve_item(
        &self,
        page: &AdminItemsQuery,
        item_id: &str,
    ) -> Result<ItemMutationResponse> {
        handlers::admin::approve_item(&self.ctx, page, item_id).await
    }

    pub async fn reject_item(
        &self,
        page: &AdminItemsQuery,
        item_id: &str,
        reason: &str,
    ) -> Result<ItemMutationResponse> {
        handlers::admin::reject_item(&self.ctx, page, item_id, reason).await
    }

    pub async fn admin_delete_item(&self, item_id: &str) -> Result<()> {
        handlers::admin::delete_item(&self.ctx, item_id).await
    }

    pub async fn update_user_role(&self, user_id: &str, role: Role) -> Result<()> {
        handlers::admin::update_user_role(&self.ctx, user_id, role).await
    }

    pub async fn update_user_points(&self, user_id: &str, points: i64) -> Result<()> {
        handlers::admin::update_user_points(&self.ctx, user_id, points).await
    }
}
