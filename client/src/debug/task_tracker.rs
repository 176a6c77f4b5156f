//! Async task lifecycle tracking

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::task::JoinHandle;

/// Monotonic id handed to each spawned task
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);

/// Tasks spawned and not yet finished
static ACTIVE_TASKS: AtomicU64 = AtomicU64::new(0);

/// Get current number of active tasks
pub fn active_task_count() -> u64 {
    ACTIVE_TASKS.load(Ordering::Relaxed)
}

/// Spawn an instrumented async task with lifecycle tracking
///
/// Logs spawn and completion with a task id and the elapsed time. Used for
/// background query refetches, interval polling and fire-and-forget work.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() {
/// client::debug::spawn_tracked("refetch", async move {
///     // ...
/// });
/// # }
/// ```
pub fn spawn_tracked<F>(name: &'static str, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task_id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    ACTIVE_TASKS.fetch_add(1, Ordering::Relaxed);
    let start = Instant::now();

    tracing::debug!(task = %name, task_id = task_id, "Task spawned");

    tokio::spawn(async move {
        let result = future.await;
        let duration = start.elapsed();

        tracing::debug!(
            task = %name,
            task_id = task_id,
            duration_ms = duration.as_millis(),
            "Task completed"
        );

        if duration.as_secs() > 30 {
            tracing::warn!(
                task = %name,
                task_id = task_id,
                duration_ms = duration.as_millis(),
                "Task took very long (potential hang)"
            );
        }

        ACTIVE_TASKS.fetch_sub(1, Ordering::Relaxed);
        result
    })
}

/// True when called from inside a tokio runtime
pub fn has_runtime() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}
