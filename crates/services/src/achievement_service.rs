use std::sync::Arc;

use tracing::debug;

use backend::RemoteGateway;
use trilha_core::Clock;
use trilha_core::model::{Achievement, AchievementInput, local_record_id};

/// Issues achievement records tied to a user and a module number parsed
/// from the human-readable title.
///
/// Achievements are fire-and-forget: one per completion event, never
/// deduplicated, never updated.
pub struct AchievementService {
    gateway: Arc<dyn RemoteGateway>,
    clock: Clock,
}

impl AchievementService {
    #[must_use]
    pub fn new(gateway: Arc<dyn RemoteGateway>, clock: Clock) -> Self {
        Self { gateway, clock }
    }

    /// Creates an achievement for `user_id` from a title like
    /// `"Módulo 2 Concluído"` (module number parsed from the digits,
    /// defaulting to 1).
    ///
    /// When the backend is unreachable the achievement is synthesized
    /// locally so the completion flow can still render it.
    pub async fn issue(&self, user_id: &str, title: &str) -> Achievement {
        let input = AchievementInput::from_title(user_id, title);
        match self.gateway.create_achievement(&input).await {
            Some(created) => created,
            None => {
                debug!(user_id, title, "achievement create degraded to local record");
                Achievement {
                    id: local_record_id(),
                    user_id: input.user_id,
                    title: input.title,
                    module_number: input.module_number,
                    created_at: self.clock.now(),
                }
            }
        }
    }
}
