use std::sync::Arc;

use crate::progress_service::ProgressService;

/// Read-only policy deciding whether a module may be entered.
pub struct GateService {
    progress: Arc<ProgressService>,
}

impl GateService {
    #[must_use]
    pub fn new(progress: Arc<ProgressService>) -> Self {
        Self { progress }
    }

    /// Module 1 is always open. Any later module opens once the user has
    /// at least `module_number - 1` completed progress records.
    ///
    /// The threshold counts completed records of ANY module number; it
    /// does not require modules `1..module_number` contiguously. Degrades
    /// to cached records when the backend is down, so an offline learner
    /// keeps access to modules they already reached.
    pub async fn can_start_module(&self, user_id: &str, module_number: u32) -> bool {
        if module_number <= 1 {
            return true;
        }

        let records = self.progress.list_for_user(user_id).await.into_inner();
        let completed = records.iter().filter(|p| p.completed).count();
        completed >= (module_number - 1) as usize
    }
}
