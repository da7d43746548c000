use serde::{Deserialize, Serialize};

use crate::model::Achievement;
use crate::stats::{MAX_MODULE, POINTS_PER_MODULE, accuracy_percent};

//
// ─── USER AGGREGATE ────────────────────────────────────────────────────────────
//

/// The learner aggregate as the remote backend stores it.
///
/// The id is owned by the identity provider and never generated here.
/// All counters are all-time totals; `precision` is derived from the
/// cumulative answer counts and recomputed on every completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub modules_completed: Vec<u32>,
    #[serde(default = "default_current_module")]
    pub current_module: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub wrong_answers: u32,
    #[serde(default)]
    pub precision: u32,
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

fn default_current_module() -> u32 {
    1
}

/// One completed attempt, as fed into the user aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionAttempt {
    pub module_number: u32,
    pub coins_earned: u32,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub time_spent: u64,
}

impl User {
    /// A brand-new learner: role `user`, everything at zero, module 1 unlocked.
    #[must_use]
    pub fn with_defaults(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: "user".to_string(),
            coins: 0,
            points: 0,
            modules_completed: Vec::new(),
            current_module: 1,
            correct_answers: 0,
            wrong_answers: 0,
            precision: 0,
            time_spent: 0,
            achievements: Vec::new(),
        }
    }

    /// A placeholder base for cache merges when the user was never fully
    /// fetched. Carries only the id; every other field is the default.
    #[must_use]
    pub fn skeleton(id: impl Into<String>) -> Self {
        Self::with_defaults(id, "", "")
    }

    /// Folds a completed attempt into the all-time totals.
    ///
    /// Points and coins are added, never overwritten; the completed-module
    /// set is a union (repeating a module does not duplicate the entry);
    /// precision is recomputed from the new cumulative answer counts; the
    /// unlock pointer advances to the next module, capped at `MAX_MODULE`.
    pub fn apply_completion(&mut self, attempt: CompletionAttempt) {
        self.points += POINTS_PER_MODULE;
        self.coins += attempt.coins_earned;
        if !self.modules_completed.contains(&attempt.module_number) {
            self.modules_completed.push(attempt.module_number);
        }
        self.correct_answers += attempt.correct_count;
        self.wrong_answers += attempt.wrong_count;
        self.time_spent += attempt.time_spent;
        self.precision = accuracy_percent(self.correct_answers, self.wrong_answers);
        self.current_module = (attempt.module_number + 1).min(MAX_MODULE);
    }
}

//
// ─── UPDATE WHITELIST ──────────────────────────────────────────────────────────
//

/// The mutable slice of a user record.
///
/// Only progression fields can be expressed here, so an update can never
/// touch identity fields (name, email, role) by accident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules_completed: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_module: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_answers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl UserPatch {
    /// Captures every mutable field of `user` as a full patch.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            coins: Some(user.coins),
            points: Some(user.points),
            modules_completed: Some(user.modules_completed.clone()),
            current_module: Some(user.current_module),
            correct_answers: Some(user.correct_answers),
            wrong_answers: Some(user.wrong_answers),
            time_spent: Some(user.time_spent),
            precision: Some(user.precision),
        }
    }

    /// Merges the patch over `base`, leaving unset fields untouched.
    #[must_use]
    pub fn apply_to(&self, mut base: User) -> User {
        base.id = self.id.clone();
        if let Some(coins) = self.coins {
            base.coins = coins;
        }
        if let Some(points) = self.points {
            base.points = points;
        }
        if let Some(modules) = &self.modules_completed {
            base.modules_completed = modules.clone();
        }
        if let Some(current) = self.current_module {
            base.current_module = current;
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
        if let Some(precision) = self.precision {
            base.precision = precision;
        }
        base
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
