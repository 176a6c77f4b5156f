//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the client and backend via the REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, registration, profile and password DTOs
//! - [`user`] - User profiles, entity references, dashboard stats and activity
//! - [`item`] - Item listings, filters, pagination and item mutations
//! - [`swap`] - Swap creation, responses and lifecycle status
//! - [`admin`] - Moderation queue, user administration and reports
//!
//! ## Serialization Format
//!
//! - **Field naming**: camelCase on the wire
//! - **Identifiers**: `_id`
//! - **Enums**: lowercase strings (`"pending"`, `"points"`, `"admin"`)
//! - **Responses**: the canonical payload, after the client gateway has stripped any
//!   `{ "data": ... }` envelope
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/swaps
//! Content-Type: application/json
//!
//! {
//!   "requestedItem": "665f1c...",
//!   "message": "Would you take points?",
//!   "swapType": "points",
//!   "pointsOffered": 100
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 201 Created
//! Content-Type: application/json
//!
//! {
//!   "swap": {
//!     "_id": "6660aa...",
//!     "requestedItem": "665f1c...",
//!     "requester": "6650b2...",
//!     "swapType": "points",
//!     "pointsOffered": 100,
//!     "status": "pending"
//!   }
//! }
//! ```

pub mod admin;
pub mod auth;
pub mod item;
pub mod swap;
pub mod user;

pub use admin::*;
pub use auth::*;
pub use item::*;
pub use swap::*;
pub use user::*;
