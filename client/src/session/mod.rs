//! # Session
//!
//! Who is logged in, how that survives a restart, and the operations that change it.
//!
//! - [`store`]: the shared [`SessionStore`] handle and its state snapshot
//! - [`persist`]: file and in-memory persistence backends
//! - [`auth`]: login, registration and profile operations

pub mod auth;
pub mod persist;
pub mod store;

pub use auth::AuthService;
pub use persist::{FileSessionStorage, MemorySessionStorage, PersistedSession, SessionPersistence};
pub use store::{SessionState, SessionStore};
