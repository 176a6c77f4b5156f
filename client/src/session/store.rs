//! # Session Store
//!
//! Single source of truth for "who is logged in".
//!
//! Every component reads identity from here; only the session layer writes it.
//! Each write is persisted immediately so the session survives a restart.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::{UserProfile, UserStatsPatch};

use super::persist::{PersistedSession, SessionPersistence};
use crate::services::notifications::Notifier;

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    /// An auth operation is in flight; never persisted
    pub is_loading: bool,
}

impl SessionState {
    fn persisted(&self) -> PersistedSession {
        PersistedSession {
            user: self.user.clone(),
            token: self.token.clone(),
            is_authenticated: self.is_authenticated,
        }
    }
}

impl From<PersistedSession> for SessionState {
    fn from(saved: PersistedSession) -> Self {
        Self {
            user: saved.user,
            token: saved.token,
            is_authenticated: saved.is_authenticated,
            is_loading: false,
        }
    }
}

/// Shared handle to the session
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    persistence: Arc<dyn SessionPersistence>,
    notifier: Notifier,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Restore the persisted session, or start logged out
    ///
    /// A snapshot that cannot be read is logged and ignored.
    pub fn new(persistence: Arc<dyn SessionPersistence>, notifier: Notifier) -> Self {
        let state = match persistence.load() {
            Ok(Some(saved)) => {
                tracing::info!(
                    authenticated = saved.is_authenticated,
                    has_token = saved.token.is_some(),
                    "Session restored"
                );
                SessionState::from(saved)
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore session, starting logged out");
                SessionState::default()
            }
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            persistence,
            notifier,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().user.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.read().user.as_ref().map(|u| u.id.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().user.as_ref().is_some_and(|u| u.is_admin())
    }

    /// Clear user and token. Always succeeds locally.
    pub fn logout(&self) {
        self.write(|state| {
            *state = SessionState::default();
        });
        tracing::info!("Session cleared");
        self.notifier.success("Logged out successfully");
    }

    /// Set the absolute points balance of the cached user
    pub fn update_points(&self, points: i64) {
        self.update_stats(&UserStatsPatch {
            points: Some(points),
            ..Default::default()
        });
    }

    /// Merge counters into the cached user without a network call
    pub fn update_stats(&self, patch: &UserStatsPatch) {
        self.write(|state| {
            if let Some(user) = state.user.as_mut() {
                user.apply_patch(patch);
            }
        });
    }

    pub(crate) fn set_authenticated(&self, user: UserProfile, token: String) {
        self.write(|state| {
            state.user = Some(user);
            state.token = Some(token);
            state.is_authenticated = true;
            state.is_loading = false;
        });
    }

    pub(crate) fn set_user(&self, user: UserProfile) {
        self.write(|state| {
            state.user = Some(user);
            if state.token.is_some() {
                state.is_authenticated = true;
            }
        });
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.state.write().is_loading = loading;
    }

    fn write(&self, f: impl FnOnce(&mut SessionState)) {
        let saved = {
            let mut state = self.state.write();
            f(&mut state);
            state.persisted()
        };

        if let Err(e) = self.persistence.save(&saved) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }
}
