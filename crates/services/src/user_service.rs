use std::sync::Arc;

use tracing::debug;

use backend::{FallbackCache, IdentityProvider, RemoteGateway};
use trilha_core::model::{User, UserPatch};

use crate::fetched::Fetched;
use crate::locks::KeyedLocks;

/// Get-or-create and update operations for the user aggregate, with
/// read-through fallback to the last-known-good cache.
pub struct UserService {
    gateway: Arc<dyn RemoteGateway>,
    cache: FallbackCache,
    identity: Arc<dyn IdentityProvider>,
    creates: KeyedLocks,
}

impl UserService {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        cache: FallbackCache,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            gateway,
            cache,
            identity,
            creates: KeyedLocks::new(),
        }
    }

    /// Looks a user up, preferring the backend.
    ///
    /// The cache is peeked first for the common already-loaded case, but a
    /// successful remote fetch always supersedes it (and refreshes it).
    /// Only when the remote call fails does the cached copy win.
    pub async fn get_user(&self, id: &str) -> Option<Fetched<User>> {
        let cached = self.cache.get_user(id);
        match self.gateway.fetch_user(id).await {
            Some(user) => {
                self.cache.put_user(user.clone());
                Some(Fetched::remote(user))
            }
            None => {
                if cached.is_some() {
                    debug!(user_id = id, "serving user from fallback cache");
                }
                cached.map(Fetched::cached)
            }
        }
    }

    /// Creates a brand-new default user record.
    ///
    /// When the backend is unreachable the constructed default is cached
    /// and returned with `Source::Cache`; the flow continues either way.
    pub async fn create_with_defaults(
        &self,
        id: &str,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Fetched<User> {
        let user = User::with_defaults(id, name, email);
        match self.gateway.create_user(&user).await {
            Some(created) => {
                self.cache.put_user(created.clone());
                Fetched::remote(created)
            }
            None => {
                debug!(user_id = id, "user create degraded to cache-only");
                self.cache.put_user(user.clone());
                Fetched::cached(user)
            }
        }
    }

    /// Get-or-create for the current learner.
    ///
    /// Name and email come from the identity provider's token claims when
    /// they match the requested id; the email falls back to a synthetic
    /// `user-<id>@temp.com`. Creation is serialized per user id so two
    /// racing callers settle on a single create.
    pub async fn ensure_user(&self, id: &str) -> Fetched<User> {
        let lock = self.creates.for_key(id);
        let _guard = lock.lock().await;

        if let Some(found) = self.get_user(id).await {
            return found;
        }

        let claims = self.identity.current().filter(|c| c.user_id == id);
        let name = claims
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| "Aluno".to_string());
        let email = claims
            .and_then(|c| c.email)
            .unwrap_or_else(|| format!("user-{id}@temp.com"));
        self.create_with_defaults(id, name, email).await
    }

    /// Applies a whitelisted update to the user record.
    ///
    /// The patch type can only express progression fields, so identity
    /// fields are structurally safe. On remote failure the patch is merged
    /// into whatever was cached under the patch id (a skeleton base when
    /// the user was never fully fetched) and the merge is cached back.
    pub async fn update_user(&self, patch: &UserPatch) -> Fetched<User> {
        match self.gateway.update_user(patch).await {
            Some(updated) => {
                self.cache.put_user(updated.clone());
                Fetched::remote(updated)
            }
            None => {
                debug!(user_id = %patch.id, "user update degraded to cache merge");
                let base = self
                    .cache
                    .get_user(&patch.id)
                    .unwrap_or_else(|| User::skeleton(&patch.id));
                let merged = patch.apply_to(base);
                self.cache.put_user(merged.clone());
                Fetched::cached(merged)
            }
        }
    }
}
