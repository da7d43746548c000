use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

/// Per-key async locks.
///
/// Serializes get-or-create and read-modify-write sequences for one key
/// (a user, or a user/module pair) without blocking unrelated keys.
/// Entries are created on first use and never evicted; the key space is
/// bounded by the users active in one process lifetime.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl KeyedLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for `key`.
    #[must_use]
    pub fn for_key(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut guard = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            guard
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }
}
