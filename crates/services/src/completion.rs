use std::sync::Arc;

use trilha_core::Clock;
use trilha_core::model::{
    Achievement, CompletionAttempt, Progress, ProgressPatch, User, UserPatch,
};
use trilha_core::stats::{POINTS_PER_MODULE, accuracy_percent};

use crate::achievement_service::AchievementService;
use crate::error::CompletionError;
use crate::fetched::Fetched;
use crate::locks::KeyedLocks;
use crate::progress_service::ProgressService;
use crate::user_service::UserService;

//
// ─── INPUT / OUTCOME ───────────────────────────────────────────────────────────
//

/// Everything the UI hands over when a module session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCompletionInput {
    pub user_id: String,
    pub progress_id: String,
    pub module_number: u32,
    /// Seconds spent on this attempt.
    pub time_spent: u64,
    pub achievement_title: String,
    pub coins_earned: u32,
    pub correct_count: u32,
    pub wrong_count: u32,
}

/// The state after a completed module, returned so the caller can render
/// the result screen without re-fetching anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleCompletion {
    pub user: User,
    pub progress: Progress,
    pub achievement: Achievement,
    /// Accuracy of this attempt (not the all-time precision).
    pub accuracy: u32,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub coins_earned: u32,
    pub points_earned: u32,
}

//
// ─── ORCHESTRATOR ──────────────────────────────────────────────────────────────
//

/// The central write transaction of the engine.
///
/// Marks the progress record completed, folds the attempt into the user
/// aggregate, advances the unlock pointer and issues the achievement, in
/// that order. Each step is a best-effort remote write with local fallback.
/// Backend unavailability never fails the flow; the only hard failure is
/// a user that exists nowhere at all.
pub struct CompletionService {
    users: Arc<UserService>,
    progress: Arc<ProgressService>,
    achievements: Arc<AchievementService>,
    clock: Clock,
    per_user: KeyedLocks,
}

impl CompletionService {
    #[must_use]
    pub fn new(
        users: Arc<UserService>,
        progress: Arc<ProgressService>,
        achievements: Arc<AchievementService>,
        clock: Clock,
    ) -> Self {
        Self {
            users,
            progress,
            achievements,
            clock,
            per_user: KeyedLocks::new(),
        }
    }

    /// Finishes a module attempt.
    ///
    /// Invocations for the same user are serialized through a per-user
    /// lock, so a double-tapped submit cannot compute two additive updates
    /// from the same stale aggregate.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::UserUnavailable` when the user exists in
    /// neither the backend nor the cache, the one case with no base
    /// object to update.
    pub async fn finish_module(
        &self,
        input: ModuleCompletionInput,
    ) -> Result<ModuleCompletion, CompletionError> {
        let lock = self.per_user.for_key(&input.user_id);
        let _serialized = lock.lock().await;

        // Locate the progress record to recover the attempt's recorded
        // mistakes: by id in the cache, else by (user, module) remotely,
        // else a synthesized stand-in.
        let module_id = input.module_number.to_string();
        let existing = match self.progress.find_by_record_id_cached(&input.progress_id) {
            Some(found) => found,
            None => match self
                .progress
                .get_module_progress(&input.user_id, &module_id)
                .await
            {
                Some(found) => found.into_inner(),
                None => {
                    let stand_in = Progress::new_empty(
                        input.progress_id.clone(),
                        &input.user_id,
                        &module_id,
                        input.module_number,
                    );
                    // Seed the cache so the update below can merge onto a
                    // full record instead of returning a bare patch.
                    self.progress.remember(stand_in.clone());
                    stand_in
                }
            },
        };

        let accuracy = accuracy_percent(input.correct_count, input.wrong_count);
        let completed_at = self.clock.now();

        // This attempt replaces the prior snapshot for the module; the
        // recovered error details ride along so the overwrite cannot
        // clobber them.
        let progress_patch = ProgressPatch {
            id: existing.id.clone(),
            accuracy: Some(accuracy),
            correct_answers: Some(input.correct_count),
            wrong_answers: Some(input.wrong_count),
            time_spent: Some(input.time_spent),
            completed: Some(true),
            completed_at: Some(completed_at),
            error_details: Some(existing.error_details.clone()),
        };
        let progress = self
            .progress
            .update_module_progress(&progress_patch)
            .await
            .into_inner();

        // The user aggregate is the one thing that must exist somewhere.
        let mut user = self
            .users
            .get_user(&input.user_id)
            .await
            .map(Fetched::into_inner)
            .ok_or_else(|| CompletionError::UserUnavailable(input.user_id.clone()))?;

        user.apply_completion(CompletionAttempt {
            module_number: input.module_number,
            coins_earned: input.coins_earned,
            correct_count: input.correct_count,
            wrong_count: input.wrong_count,
            time_spent: input.time_spent,
        });

        let user = self
            .users
            .update_user(&UserPatch::from_user(&user))
            .await
            .into_inner();

        let achievement = self
            .achievements
            .issue(&input.user_id, &input.achievement_title)
            .await;

        Ok(ModuleCompletion {
            user,
            progress,
            achievement,
            accuracy,
            correct_count: input.correct_count,
            wrong_count: input.wrong_count,
            coins_earned: input.coins_earned,
            points_earned: POINTS_PER_MODULE,
        })
    }
}
