//! # Notifications
//!
//! Toasts and navigation requests, queued as [`AppEvent`]s for the front end.
//!
//! Sending never blocks and never fails loudly: the channel is unbounded, and a
//! closed channel (front end gone) only produces a debug log.

use async_channel::{Receiver, Sender};

use crate::app::events::{AppEvent, ToastLevel};
use crate::app::routes::Route;

/// Notification sender shared by the gateway, the session store and handlers
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Sender<AppEvent>,
}

impl Notifier {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self { tx }
    }

    /// A notifier plus the receiving end of its channel
    pub fn channel() -> (Self, Receiver<AppEvent>) {
        let (tx, rx) = async_channel::unbounded();
        (Self::new(tx), rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Info, message);
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigation requested");
        self.emit(AppEvent::Navigate(route));
    }

    fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(level = ?level, message = %message, "Toast");
        self.emit(AppEvent::toast(level, message));
    }

    fn emit(&self, event: AppEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::debug!(error = %e, "Event dropped, no receiver");
        }
    }
}

/// Drain every event currently queued
pub fn drain(rx: &Receiver<AppEvent>) -> Vec<AppEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
