//! Poison-tolerant lock acquisition for state shared with timer tasks.

use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Lock `lock`, taking over the guard if a timer callback panicked while holding it.
pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    source: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!(
            target: "devguide::lock",
            source,
            op,
            "Recovered poisoned lock; state may reflect a half-finished update"
        );
        lock.clear_poison();
        poisoned.into_inner()
    })
}
