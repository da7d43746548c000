use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use trilha_core::model::{Progress, User};

/// Process-lifetime last-known-value store, consulted only when the remote
/// backend fails.
///
/// Two keyed maps: users by id, progress by `"{user_id}:{module_id}"`.
/// No TTL, no size bound, no persistence: this is best-effort fallback,
/// never a source of truth. Constructed once at startup and handed to the
/// services by reference, so each test can inject a fresh one.
#[derive(Clone, Default)]
pub struct FallbackCache {
    users: Arc<Mutex<HashMap<String, User>>>,
    progress: Arc<Mutex<HashMap<String, Progress>>>,
}

impl FallbackCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn progress_key(user_id: &str, module_id: &str) -> String {
        format!("{user_id}:{module_id}")
    }

    #[must_use]
    pub fn get_user(&self, id: &str) -> Option<User> {
        let guard = self.users.lock().ok()?;
        guard.get(id).cloned()
    }

    pub fn put_user(&self, user: User) {
        if let Ok(mut guard) = self.users.lock() {
            guard.insert(user.id.clone(), user);
        }
    }

    #[must_use]
    pub fn get_progress(&self, user_id: &str, module_id: &str) -> Option<Progress> {
        let guard = self.progress.lock().ok()?;
        guard.get(&Self::progress_key(user_id, module_id)).cloned()
    }

    pub fn put_progress(&self, progress: Progress) {
        let key = Self::progress_key(&progress.user_id, &progress.module_id);
        if let Ok(mut guard) = self.progress.lock() {
            guard.insert(key, progress);
        }
    }

    /// Looks a progress record up by its record id.
    ///
    /// The map is keyed by `user:module`, not by id, so this is a full
    /// value scan; the cache stays small (one entry per opened module).
    #[must_use]
    pub fn find_progress_by_record_id(&self, id: &str) -> Option<Progress> {
        let guard = self.progress.lock().ok()?;
        guard.values().find(|p| p.id == id).cloned()
    }

    /// All cached progress records belonging to a user.
    #[must_use]
    pub fn progress_for_user(&self, user_id: &str) -> Vec<Progress> {
        match self.progress.lock() {
            Ok(guard) => guard
                .values()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
