//! # ReWear Marketplace Client - Library Root
//!
//! Client library for the ReWear community clothing-exchange marketplace.
//! This library crate contains all modules used by the binary crate (`main.rs`)
//! and by any front end that renders the marketplace.
//!
//! ## Features
//!
//! - **Session**: Login, registration and a persisted session that survives restarts
//! - **API Gateway**: Bearer auth, forced logout on 401, blanket error toasts
//! - **Query Cache**: Deduplicated fetches, coarse invalidation, optimistic updates
//! - **Swap Workflow**: Swap state machine, points redemption and owner buy-back
//! - **Moderation**: Admin approval queue, user roles and points
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              client (this crate)                       │
//! ├────────────────────────────────────────────────────────┤
//! │  app        - App root, routes, swap rules, handlers   │
//! │  cache      - Query cache and views                    │
//! │  session    - Session store, persistence, auth         │
//! │  services   - API gateway and notifications            │
//! │  core       - Errors and the MarketplaceApi trait      │
//! └────────────────────────────────────────────────────────┘
//!          │ HTTP (reqwest, JSON + multipart)
//!          ▼
//! ┌─────────────────┐
//! │  ReWear REST API│
//! └─────────────────┘
//! ```
//!
//! ## Module Dependency Graph
//!
//! ```text
//! main.rs
//!   │
//!   └── app (App, AppContext)
//!       ├── handlers ──► core::service::MarketplaceApi ◄── services::api::ApiClient
//!       ├── cache (QueryCache, QueryView)
//!       ├── session (SessionStore, AuthService)
//!       └── services::notifications (AppEvent channel)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use client::app::App;
//! use client::config::ClientConfig;
//! use shared::ItemFilters;
//!
//! # async fn run() -> client::core::Result<()> {
//! let config = ClientConfig::from_env();
//! let app = App::new(&config)?;
//! app.initialize().await;
//!
//! let listing = app.items(ItemFilters::default()).await?;
//! println!("{} items", listing.items.len());
//!
//! for event in app.drain_events() {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod session;
pub mod utils;
