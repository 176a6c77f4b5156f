//! # Remote-Data Cache
//!
//! Request/response cache for backend queries, owned by the application root and
//! handed to whatever needs it.
//!
//! ## Module Structure
//!
//! ```text
//! cache/
//! ├── key.rs          - QueryKey and ResourceKind
//! ├── query_cache.rs  - QueryCache: dedup, invalidation, optimistic updates
//! ├── query.rs        - Query<T>: key + options + fetcher
//! └── view.rs         - QueryView<T>: one observer slot with keep-previous-data
//! ```

pub mod key;
pub mod query;
pub mod query_cache;
pub mod view;

pub use key::{QueryKey, ResourceKind};
pub use query::Query;
pub use query_cache::{QueryCache, QueryOptions, QueryState, QueryStatus, Rollback};
pub use view::QueryView;
