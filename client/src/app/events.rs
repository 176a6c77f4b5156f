//! # Application Events
//!
//! Side effects produced by background work and delivered to whatever front end
//! drives the client (toasts, navigation).

use crate::app::routes::Route;

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// Events sent to the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Transient user-visible notification
    Toast { level: ToastLevel, message: String },
    /// Move to another page
    Navigate(Route),
}

impl AppEvent {
    pub fn toast(level: ToastLevel, message: impl Into<String>) -> Self {
        AppEvent::Toast {
            level,
            message: message.into(),
        }
    }

    /// Message of a toast event of the given level
    pub fn toast_message(&self, wanted: ToastLevel) -> Option<&str> {
        match self {
            AppEvent::Toast { level, message } if *level == wanted => Some(message),
            _ => None,
        }
    }
}
