//! # Debugging and Tracing Infrastructure
//!
//! File-based structured logging and tracked task spawning.
//!
//! ## Features
//!
//! - **File-based logging**: Structured logs to `<log_dir>/client.log` (daily rotation)
//! - **Async task tracking**: Spawn/completion logs with task ids and durations
//! - **Panic logging**: Panics are written to the log before the default hook runs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use client::config::ClientConfig;
//!
//! let config = ClientConfig::from_env();
//! // Keep the guard alive for the lifetime of the program
//! let _guard = client::debug::init(&config);
//!
//! tracing::info!(endpoint = "/items", duration_ms = 234, "API call completed");
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `client=debug,info`)
//! - `REWEAR_LOG_DIR`: Log directory (default: `logs`)
//! - `REWEAR_LOG_STDERR`: Mirror logs to stderr (1=on)

pub mod logger;
pub mod task_tracker;

pub use logger::init;
pub use task_tracker::{active_task_count, has_runtime, spawn_tracked};
