use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

//
// ─── ERROR DETAILS ─────────────────────────────────────────────────────────────
//

/// One mis-answered question from the latest attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub question_number: u32,
    pub question: String,
    pub user_answer: String,
    pub expected_answer: String,
}

/// Raised when an `errorDetails` payload cannot be parsed strictly.
#[derive(Debug, Error)]
#[error("malformed error details payload: {0}")]
pub struct ErrorDetailsError(#[from] serde_json::Error);

/// Strict parse of the wire form (a JSON array serialized as text).
///
/// # Errors
///
/// Returns `ErrorDetailsError` if the text is not a JSON array of details.
pub fn parse_error_details(text: &str) -> Result<Vec<ErrorDetail>, ErrorDetailsError> {
    Ok(serde_json::from_str(text)?)
}

/// Serializes details to the wire form. Plain structs cannot fail to
/// serialize, so an empty array stands in for the impossible case.
#[must_use]
pub fn serialize_error_details(details: &[ErrorDetail]) -> String {
    serde_json::to_string(details).unwrap_or_else(|_| "[]".to_string())
}

// The backend stores `errorDetails` as text, but some writers have sent the
// structured array directly. Accept both; unparseable text degrades to empty
// rather than failing the whole record.
fn error_details_from_wire<'de, D>(deserializer: D) -> Result<Vec<ErrorDetail>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Structured(Vec<ErrorDetail>),
    }

    match Option::<Wire>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Wire::Structured(details)) => Ok(details),
        Some(Wire::Text(text)) => Ok(parse_error_details(&text).unwrap_or_default()),
    }
}

fn error_details_to_wire<S>(details: &[ErrorDetail], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&serialize_error_details(details))
}

fn opt_error_details_to_wire<S>(
    details: &Option<Vec<ErrorDetail>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match details {
        Some(details) => error_details_to_wire(details, serializer),
        None => serializer.serialize_none(),
    }
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Prefix marking a record that was synthesized while the backend was
/// unreachable and exists only in the fallback cache.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Mints an id for a cache-only progress record.
#[must_use]
pub fn local_record_id() -> String {
    format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4())
}

/// Per-user, per-module snapshot of the most recent attempt.
///
/// At most one record per `(userId, moduleNumber)` pair is authoritative;
/// repeated attempts overwrite this record instead of creating another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Empty until the backend assigns one at creation; empty ids are
    /// omitted from the wire so creates carry no id field.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub user_id: String,
    /// String form of the module number; the backend filter key.
    pub module_id: String,
    pub module_number: u32,
    #[serde(default)]
    pub accuracy: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub wrong_answers: u32,
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "error_details_from_wire",
        serialize_with = "error_details_to_wire"
    )]
    pub error_details: Vec<ErrorDetail>,
}

impl Progress {
    /// A zeroed record for a module the user just opened.
    #[must_use]
    pub fn new_empty(
        id: impl Into<String>,
        user_id: impl Into<String>,
        module_id: impl Into<String>,
        module_number: u32,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            module_id: module_id.into(),
            module_number,
            accuracy: 0,
            correct_answers: 0,
            wrong_answers: 0,
            time_spent: 0,
            completed: false,
            completed_at: None,
            error_details: Vec::new(),
        }
    }

    /// True when this record never reached the backend.
    #[must_use]
    pub fn is_local_only(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }
}

//
// ─── UPDATE WHITELIST ──────────────────────────────────────────────────────────
//

/// The mutable slice of a progress record; identity and ownership fields
/// (`userId`, `moduleId`, `moduleNumber`) cannot be expressed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPatch {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_answers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "opt_error_details_to_wire"
    )]
    pub error_details: Option<Vec<ErrorDetail>>,
}

impl ProgressPatch {
    /// Merges the patch over an existing record, leaving unset fields as-is.
    #[must_use]
    pub fn apply_to(&self, mut base: Progress) -> Progress {
        base.id = self.id.clone();
        if let Some(accuracy) = self.accuracy {
            base.accuracy = accuracy;
        }
        if let Some(correct) = self.correct_answers {
            base.correct_answers = correct;
        }
        if let Some(wrong) = self.wrong_answers {
            base.wrong_answers = wrong;
        }
        if let Some(time) = self.time_spent {
            base.time_spent = time;
        }
        if let Some(completed) = self.completed {
            base.completed = completed;
        }
        if let Some(completed_at) = self.completed_at {
            base.completed_at = Some(completed_at);
        }
        if let Some(details) = &self.error_details {
            base.error_details = details.clone();
        }
        base
    }

    /// Materializes the patch with no base record at all.
    ///
    /// Used on the failure path when neither the backend nor the cache knows
    /// the record: ownership fields come back empty and callers must
    /// tolerate the partial object.
    #[must_use]
    pub fn into_partial(self) -> Progress {
        let base = Progress::new_empty(self.id.clone(), "", "", 0);
        self.apply_to(base)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn detail(n: u32) -> ErrorDetail {
        ErrorDetail {
            question_number: n,
            question: format!("Pergunta {n}"),
            user_answer: "b".to_string(),
            expected_answer: "a".to_string(),
        }
    }

    #[test]
    fn new_record_is_zeroed() {
        let progress = Progress::new_empty("p1", "u1", "3", 3);
        assert_eq!(progress.module_number, 3);
        assert_eq!(progress.accuracy, 0);
        assert!(!progress.completed);
        assert!(progress.completed_at.is_none());
        assert!(progress.error_details.is_empty());
    }

    #[test]
    fn local_ids_are_marked() {
        let id = local_record_id();
        assert!(id.starts_with(LOCAL_ID_PREFIX));
        let progress = Progress::new_empty(id, "u1", "1", 1);
        assert!(progress.is_local_only());
        assert!(!Progress::new_empty("p1", "u1", "1", 1).is_local_only());
    }

    #[test]
    fn error_details_cross_the_wire_as_text() {
        let mut progress = Progress::new_empty("p1", "u1", "1", 1);
        progress.error_details = vec![detail(1), detail(2)];

        let json = serde_json::to_value(&progress).unwrap();
        assert!(json["errorDetails"].is_string());

        let back: Progress = serde_json::from_value(json).unwrap();
        assert_eq!(back.error_details, progress.error_details);
    }

    #[test]
    fn structured_error_details_are_tolerated() {
        let json = serde_json::json!({
            "id": "p1",
            "userId": "u1",
            "moduleId": "1",
            "moduleNumber": 1,
            "errorDetails": [{
                "questionNumber": 4,
                "question": "Pergunta 4",
                "userAnswer": "c",
                "expectedAnswer": "d"
            }]
        });
        let progress: Progress = serde_json::from_value(json).unwrap();
        assert_eq!(progress.error_details.len(), 1);
        assert_eq!(progress.error_details[0].question_number, 4);
    }

    #[test]
    fn unparseable_error_details_degrade_to_empty() {
        let json = serde_json::json!({
            "id": "p1",
            "userId": "u1",
            "moduleId": "1",
            "moduleNumber": 1,
            "errorDetails": "not json at all"
        });
        let progress: Progress = serde_json::from_value(json).unwrap();
        assert!(progress.error_details.is_empty());
    }

    #[test]
    fn strict_parse_rejects_garbage() {
        assert!(parse_error_details("not json").is_err());
        assert_eq!(parse_error_details("[]").unwrap(), Vec::new());
    }

    #[test]
    fn patch_merges_over_existing_record() {
        let mut base = Progress::new_empty("p1", "u1", "2", 2);
        base.error_details = vec![detail(1)];

        let patch = ProgressPatch {
            id: "p1".to_string(),
            accuracy: Some(90),
            completed: Some(true),
            completed_at: Some(fixed_now()),
            ..ProgressPatch::default()
        };

        let merged = patch.apply_to(base);
        assert_eq!(merged.accuracy, 90);
        assert!(merged.completed);
        assert_eq!(merged.completed_at, Some(fixed_now()));
        // Untouched fields survive the merge.
        assert_eq!(merged.user_id, "u1");
        assert_eq!(merged.error_details.len(), 1);
    }

    #[test]
    fn partial_patch_materializes_without_ownership() {
        let patch = ProgressPatch {
            id: "p9".to_string(),
            accuracy: Some(50),
            ..ProgressPatch::default()
        };
        let partial = patch.into_partial();
        assert_eq!(partial.id, "p9");
        assert_eq!(partial.accuracy, 50);
        assert!(partial.user_id.is_empty());
        assert_eq!(partial.module_number, 0);
    }
}
