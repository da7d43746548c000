use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::module_number_from_title;

/// A badge issued once per module completion event.
///
/// Achievements are write-once: never updated, never deleted, and never
/// deduplicated; completing a module twice issues two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub module_number: u32,
    pub created_at: DateTime<Utc>,
}

/// Creation input for an achievement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementInput {
    pub user_id: String,
    pub title: String,
    pub module_number: u32,
    pub description: String,
}

impl AchievementInput {
    /// Builds the input from a human-readable title, parsing the module
    /// number out of it (e.g. `"Módulo 2 Concluído"` → module 2).
    #[must_use]
    pub fn from_title(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        let module_number = module_number_from_title(&title);
        Self {
            user_id: user_id.into(),
            description: title.clone(),
            title,
            module_number,
        }
    }
}
