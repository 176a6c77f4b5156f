//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and better testability.
//!
//! ## Modules
//!
//! - **[`error`]**: Error taxonomy (`ApiError`, `AppError`, `Result<T>`)
//! - **[`service`]**: The [`MarketplaceApi`] trait, the seam between workflow code and HTTP
//!
//! ## Dependency Injection
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use client::core::service::MarketplaceApi;
//!
//! fn build(api: Arc<dyn MarketplaceApi>) {
//!     // In production: ApiClient. In tests: a recording fake.
//!     let _ = api;
//! }
//! ```

pub mod error;
pub mod service;

pub use error::{ApiError, AppError, Result};
pub use service::MarketplaceApi;
