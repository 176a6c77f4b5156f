//! # Utility Functions
//!
//! Shared utility functions used across the client.
//!
//! ## Modules
//!
//! - **[`validation`]**: Client-side form validation (credentials, item form, images)
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Cross-crate utilities (image URL normalization)
//! - [`crate::core`]: Core abstractions and error types

pub mod validation;
