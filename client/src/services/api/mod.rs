//! # Backend API Client Module
//!
//! HTTP client for the ReWear REST backend.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports and documentation
//! ├── client.rs   - ApiClient, failure policy and envelope handling
//! ├── auth.rs     - Login, registration, profile and avatar
//! ├── items.rs    - Listings, likes, creation and owner redemption
//! ├── swaps.rs    - Swap creation and lifecycle transitions
//! ├── users.rs    - Public profiles, search, stats and activity
//! └── admin.rs    - Moderation, user administration and reports
//! ```

pub mod admin;
pub mod auth;
pub mod client;
pub mod items;
pub mod swaps;
pub mod users;

pub use client::{failure_policy, normalize_envelope, ApiClient, FailureAction};
