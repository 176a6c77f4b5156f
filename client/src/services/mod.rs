//! External services: the backend gateway and the notification channel.

pub mod api;
pub mod notifications;

pub use api::ApiClient;
pub use notifications::Notifier;
