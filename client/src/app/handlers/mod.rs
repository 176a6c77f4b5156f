//! # Event Handlers
//!
//! Mutation handlers organized by domain. Each validates locally, calls the API,
//! then applies its cache invalidations before any toast or navigation.

pub mod admin;
pub mod auth;
pub mod items;
pub mod swap;
