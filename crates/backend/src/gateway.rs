use async_trait::async_trait;
use serde::Serialize;

use trilha_core::model::{Achievement, AchievementInput, Progress, ProgressPatch, User, UserPatch};

/// Equality filter for listing progress records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressFilter {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
}

impl ProgressFilter {
    /// All progress records owned by a user.
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            module_id: None,
        }
    }

    /// The single record for one of the user's modules.
    #[must_use]
    pub fn for_module(user_id: impl Into<String>, module_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            module_id: Some(module_id.into()),
        }
    }
}

/// Typed operations against the remote backend.
///
/// Every method returns `None` on ANY failure (transport, non-2xx,
/// authorization, or an error envelope) and never panics or raises. This
/// uniform contract is what lets every repository implement fallback with a
/// single `None` branch instead of error plumbing at each call site.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn fetch_user(&self, id: &str) -> Option<User>;

    async fn create_user(&self, user: &User) -> Option<User>;

    async fn update_user(&self, patch: &UserPatch) -> Option<User>;

    async fn list_users(&self) -> Option<Vec<User>>;

    /// Lists records matching the filter; callers filtering by module use
    /// the first match.
    async fn list_progress(&self, filter: &ProgressFilter) -> Option<Vec<Progress>>;

    async fn create_progress(&self, progress: &Progress) -> Option<Progress>;

    async fn update_progress(&self, patch: &ProgressPatch) -> Option<Progress>;

    async fn create_achievement(&self, input: &AchievementInput) -> Option<Achievement>;
}
