//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between ReWear clients and the backend REST API.
//! All DTOs use JSON serialization via `serde` for API communication.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login, registration and profile management DTOs
//!   - **[`dto::user`]**: User profiles, references, stats and activity
//!   - **[`dto::item`]**: Clothing listings, filters and pagination
//!   - **[`dto::swap`]**: Swap requests and their lifecycle status
//!   - **[`dto::admin`]**: Moderation, user management and reports
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::image_url`]**: Resolve an item image reference to a fetchable URL
//!   - **[`utils::avatar_url`]**: Resolve a user avatar to a fetchable URL
//!
//! ## Wire Format
//!
//! The backend speaks camelCase JSON with MongoDB-style `_id` identifiers:
//! - Field names use **snake_case** in Rust and `#[serde(rename_all = "camelCase")]` on the wire
//! - Identifiers are serialized as `_id` (and accept a plain `id` when reading)
//! - Optional request fields are omitted when `None`
//! - References to other entities may arrive either as a bare id or as a populated object
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::swap::{CreateSwapRequest, SwapOffer};
//!
//! let request = CreateSwapRequest {
//!     requested_item: "item-1".to_string(),
//!     message: "Love this jacket".to_string(),
//!     offer: SwapOffer::Points { points_offered: 100 },
//! };
//!
//! let json = serde_json::to_value(&request).unwrap();
//! assert_eq!(json["swapType"], "points");
//! assert_eq!(json["pointsOffered"], 100);
//! ```

pub mod dto;
pub mod utils;

// Wildcard re-exports: shared is a DTO library where all exports are public API
pub use dto::*;
pub use utils::*;
