use chrono::{DateTime, Utc};

use trilha_core::model::ErrorDetail;
use trilha_core::stats::accuracy_percent;

use crate::completion::ModuleCompletionInput;

/// Buffers one live quiz attempt between module start and finish.
///
/// While a session is running the UI registers each answer here; nothing
/// touches the backend until the attempt is folded into a
/// `ModuleCompletionInput` and handed to `CompletionService`.
#[derive(Debug, Clone)]
pub struct AttemptTracker {
    user_id: String,
    progress_id: String,
    module_number: u32,
    started_at: DateTime<Utc>,
    correct: u32,
    wrong: u32,
    mistakes: Vec<ErrorDetail>,
}

impl AttemptTracker {
    /// Starts tracking an attempt against an already-ensured progress
    /// record. `started_at` should come from the services layer clock.
    #[must_use]
    pub fn begin(
        user_id: impl Into<String>,
        progress_id: impl Into<String>,
        module_number: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            progress_id: progress_id.into(),
            module_number,
            started_at,
            correct: 0,
            wrong: 0,
            mistakes: Vec::new(),
        }
    }

    pub fn register_correct(&mut self) {
        self.correct += 1;
    }

    /// Counts a wrong answer and records what went wrong, in order.
    pub fn register_wrong(&mut self, detail: ErrorDetail) {
        self.wrong += 1;
        self.mistakes.push(detail);
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn mistakes(&self) -> &[ErrorDetail] {
        &self.mistakes
    }

    /// Accuracy of the attempt so far, for live display.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.correct, self.wrong)
    }

    /// Whole seconds elapsed since the attempt began; clamped at zero if
    /// the clock moved backwards.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        now.signed_duration_since(self.started_at)
            .num_seconds()
            .try_into()
            .unwrap_or(0)
    }

    /// Closes the attempt into the orchestrator's input.
    #[must_use]
    pub fn into_completion_input(
        self,
        achievement_title: impl Into<String>,
        coins_earned: u32,
        finished_at: DateTime<Utc>,
    ) -> ModuleCompletionInput {
        let time_spent = self.elapsed_seconds(finished_at);
        ModuleCompletionInput {
            user_id: self.user_id,
            progress_id: self.progress_id,
            module_number: self.module_number,
            time_spent,
            achievement_title: achievement_title.into(),
            coins_earned,
            correct_count: self.correct,
            wrong_count: self.wrong,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
