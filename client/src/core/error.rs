//! # Common Error Types
//!
//! Consolidated error handling for the marketplace client.
//!
//! Two layers of errors exist:
//!
//! - [`ApiError`]: what the gateway observed on the wire (status class, network failure,
//!   timeout, undecodable body). It is `Clone` because a single in-flight query result is
//!   shared by every caller waiting on the same cache key.
//! - [`AppError`]: everything an operation can fail with, including failures that never
//!   reach the network (form validation, client-side authorization, illegal swap
//!   transitions).
//!
//! ## Error Categories
//!
//! | Category | Variant | User-visible treatment |
//! |---|---|---|
//! | Validation | [`AppError::Validation`] | Inline, next to the offending field |
//! | Authentication | [`ApiError::Unauthorized`] | Forced logout, redirect to login |
//! | Business rule | [`ApiError::Server`] | Toast with the server message |
//! | Not found | [`ApiError::NotFound`] | Caller renders its own "not found" view |
//! | Network / timeout | [`ApiError::Network`], [`ApiError::Timeout`] | Toast with a generic message |
//!
//! ## Usage Pattern
//!
//! ```rust
//! use client::core::error::{AppError, Result};
//!
//! fn validate_points(points: i64) -> Result<i64> {
//!     if points < 1 {
//!         return Err(AppError::validation("pointsValue", "Points value must be at least 1"));
//!     }
//!     Ok(points)
//! }
//!
//! assert!(validate_points(0).is_err());
//! ```

use thiserror::Error;

use crate::app::lifecycle::SwapAction;
use shared::SwapStatus;

/// Message shown when the server gave no usable explanation
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Failure observed by the API gateway.
///
/// # Example
///
/// ```rust
/// use client::core::error::ApiError;
///
/// let err = ApiError::Server { status: 400, message: Some("Insufficient points".to_string()) };
/// assert_eq!(err.message(), "Insufficient points");
/// assert_eq!(ApiError::Timeout.message(), "Something went wrong");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401 from the backend. The gateway has already logged the session out.
    #[error("Authentication required")]
    Unauthorized,

    /// 404 from the backend, carrying the server message when present.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response.
    ///
    /// Covers business-rule rejections such as "swap already responded to" or
    /// "insufficient points" as well as 5xx failures.
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// Connection refused, DNS failure, reset, TLS failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the uniform request timeout.
    #[error("Request timed out")]
    Timeout,

    /// A 2xx response whose body did not match the expected payload.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The request could not be built (e.g. an upload with a malformed content type).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Text for the user: the server message when one was provided, otherwise
    /// [`GENERIC_ERROR_MESSAGE`].
    pub fn message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ApiError::NotFound(message) if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Application-wide error type.
///
/// # Error Variants
///
/// - **Api**: anything the gateway reported. Toasts and forced logout have already
///   happened by the time the caller sees this; the caller only needs to stop its own
///   loading state.
/// - **Validation**: a form field failed a client-side check. Never reaches the network.
/// - **Forbidden**: the current user may not perform the action (non-owner responding
///   to a swap, non-admin moderating).
/// - **InvalidTransition**: the swap state machine has no edge for this action.
/// - **NotAuthenticated**: the operation needs a logged-in user.
/// - **Session**: the persisted session could not be read or written.
/// - **Config**: invalid configuration at startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot {action} a swap that is {from}")]
    InvalidTransition { from: SwapStatus, action: SwapAction },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The underlying gateway error, if any
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            AppError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// True for failures that were stopped before any request was sent
    pub fn is_local(&self) -> bool {
        !matches!(self, AppError::Api(_))
    }
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_falls_back_to_generic() {
        assert_eq!(
            ApiError::Server { status: 500, message: None }.message(),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(
            ApiError::Server { status: 500, message: Some("  ".to_string()) }.message(),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(ApiError::Network("refused".to_string()).message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert_eq!(ApiError::NotFound(String::new()).status(), Some(404));
        assert_eq!(ApiError::Timeout.status(), None);
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = AppError::InvalidTransition {
            from: SwapStatus::Pending,
            action: SwapAction::Complete,
        };
        assert_eq!(err.to_string(), "Cannot complete a swap that is pending");
        assert!(err.is_local());
    }

    #[test]
    fn test_api_error_converts() {
        let err: AppError = ApiError::Timeout.into();
        assert_eq!(err.api(), Some(&ApiError::Timeout));
        assert!(!err.is_local());
    }
}
