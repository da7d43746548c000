use std::sync::Arc;

use tracing::debug;

use backend::{FallbackCache, ProgressFilter, RemoteGateway};
use trilha_core::model::{Progress, ProgressPatch, local_record_id};

use crate::fetched::Fetched;
use crate::locks::KeyedLocks;

/// Get-or-create and update operations for per-module progress records,
/// with the same fallback discipline as `UserService`.
pub struct ProgressService {
    gateway: Arc<dyn RemoteGateway>,
    cache: FallbackCache,
    creates: KeyedLocks,
}

impl ProgressService {
    #[must_use]
    pub fn new(gateway: Arc<dyn RemoteGateway>, cache: FallbackCache) -> Self {
        Self {
            gateway,
            cache,
            creates: KeyedLocks::new(),
        }
    }

    /// The authoritative record for one of the user's modules.
    ///
    /// Filter-queries the backend by `(userId, moduleId)` and takes the
    /// first match; a failed or empty remote answer falls through to the
    /// cached copy, which keeps cache-only records reachable.
    pub async fn get_module_progress(
        &self,
        user_id: &str,
        module_id: &str,
    ) -> Option<Fetched<Progress>> {
        let cached = self.cache.get_progress(user_id, module_id);
        let filter = ProgressFilter::for_module(user_id, module_id);
        match self.gateway.list_progress(&filter).await {
            Some(records) => match records.into_iter().next() {
                Some(progress) => {
                    self.cache.put_progress(progress.clone());
                    Some(Fetched::remote(progress))
                }
                None => cached.map(Fetched::cached),
            },
            None => {
                if cached.is_some() {
                    debug!(user_id, module_id, "serving progress from fallback cache");
                }
                cached.map(Fetched::cached)
            }
        }
    }

    /// Creates a zeroed record for a module the user just opened.
    ///
    /// The backend assigns the record id; when it is unreachable a
    /// `local-`-prefixed id is minted and the record lives in the cache
    /// until a later write reconciles it.
    pub async fn create_module_progress(
        &self,
        user_id: &str,
        module_id: &str,
        module_number: Option<u32>,
    ) -> Fetched<Progress> {
        let module_number = module_number.unwrap_or_else(|| module_id.parse().unwrap_or(1));
        let fresh = Progress::new_empty("", user_id, module_id, module_number);
        match self.gateway.create_progress(&fresh).await {
            Some(created) => {
                self.cache.put_progress(created.clone());
                Fetched::remote(created)
            }
            None => {
                debug!(user_id, module_id, "progress create degraded to cache-only");
                let mut local = fresh;
                local.id = local_record_id();
                self.cache.put_progress(local.clone());
                Fetched::cached(local)
            }
        }
    }

    /// Get-or-create, serialized per `(user, module)` so two racing
    /// callers settle on a single record.
    pub async fn ensure_module_progress(
        &self,
        user_id: &str,
        module_id: &str,
        module_number: Option<u32>,
    ) -> Fetched<Progress> {
        let lock = self.creates.for_key(&format!("{user_id}:{module_id}"));
        let _guard = lock.lock().await;

        if let Some(found) = self.get_module_progress(user_id, module_id).await {
            return found;
        }
        self.create_module_progress(user_id, module_id, module_number)
            .await
    }

    /// Applies a whitelisted update to a progress record.
    ///
    /// On remote failure the existing cached record is found by scanning
    /// for the patch id (the cache is keyed by `user:module`, not id) and
    /// merged; with no cached match the bare patch is materialized as a
    /// partial record the caller must tolerate.
    pub async fn update_module_progress(&self, patch: &ProgressPatch) -> Fetched<Progress> {
        match self.gateway.update_progress(patch).await {
            Some(updated) => {
                self.cache.put_progress(updated.clone());
                Fetched::remote(updated)
            }
            None => match self.cache.find_progress_by_record_id(&patch.id) {
                Some(existing) => {
                    debug!(record_id = %patch.id, "progress update degraded to cache merge");
                    let merged = patch.apply_to(existing);
                    self.cache.put_progress(merged.clone());
                    Fetched::cached(merged)
                }
                None => {
                    debug!(record_id = %patch.id, "progress update degraded to bare patch");
                    Fetched::cached(patch.clone().into_partial())
                }
            },
        }
    }

    /// All progress records for a user, refreshing the cache on success
    /// and degrading to a cache scan on failure.
    pub async fn list_for_user(&self, user_id: &str) -> Fetched<Vec<Progress>> {
        match self
            .gateway
            .list_progress(&ProgressFilter::for_user(user_id))
            .await
        {
            Some(records) => {
                for record in &records {
                    self.cache.put_progress(record.clone());
                }
                Fetched::remote(records)
            }
            None => {
                debug!(user_id, "listing progress from fallback cache");
                Fetched::cached(self.cache.progress_for_user(user_id))
            }
        }
    }

    /// Cache-only lookup by record id, for callers that already hold one.
    #[must_use]
    pub fn find_by_record_id_cached(&self, id: &str) -> Option<Progress> {
        self.cache.find_progress_by_record_id(id)
    }

    /// Seeds the cache with a record known from elsewhere.
    pub(crate) fn remember(&self, progress: Progress) {
        self.cache.put_progress(progress);
    }
}
