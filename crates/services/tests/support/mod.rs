//! Scripted in-memory backend and wiring helpers for service tests.

// Each integration test crate pulls in the subset it needs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use backend::{CallerIdentity, ProgressFilter, RemoteGateway, StaticIdentity};
use services::{AppServices, Clock};
use trilha_core::model::{Achievement, AchievementInput, Progress, ProgressPatch, User, UserPatch};
use trilha_core::time::fixed_now;

/// Token claims for the default test learner.
pub fn caller(user_id: &str) -> CallerIdentity {
    CallerIdentity {
        user_id: user_id.to_string(),
        name: Some("Ana".to_string()),
        email: Some("ana@example.com".to_string()),
        bearer_token: None,
    }
}

/// Services wired over the fake gateway with the default identity.
pub fn app(fake: &Arc<FakeGateway>) -> AppServices {
    app_with_identity(fake, StaticIdentity::new(caller("u1")))
}

pub fn app_with_identity(fake: &Arc<FakeGateway>, identity: StaticIdentity) -> AppServices {
    let gateway: Arc<dyn RemoteGateway> = Arc::clone(fake) as Arc<dyn RemoteGateway>;
    AppServices::new(gateway, Arc::new(identity), Clock::fixed(fixed_now()))
}

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    progress: Vec<Progress>,
    achievements: Vec<Achievement>,
    next_id: u32,
    offline: bool,
    user_create_calls: u32,
    progress_create_calls: u32,
}

/// A fake remote backend: healthy by default, switchable to a mode where
/// every operation fails, with call counters for create operations.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<State>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn go_offline(&self) {
        self.state.lock().unwrap().offline = true;
    }

    pub fn go_online(&self) {
        self.state.lock().unwrap().offline = false;
    }

    pub fn seed_user(&self, user: User) {
        self.state.lock().unwrap().users.insert(user.id.clone(), user);
    }

    pub fn seed_progress(&self, progress: Progress) {
        self.state.lock().unwrap().progress.push(progress);
    }

    pub fn stored_user(&self, id: &str) -> Option<User> {
        self.state.lock().unwrap().users.get(id).cloned()
    }

    pub fn stored_progress(&self, id: &str) -> Option<Progress> {
        self.state
            .lock()
            .unwrap()
            .progress
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        self.state.lock().unwrap().achievements.clone()
    }

    pub fn user_create_calls(&self) -> u32 {
        self.state.lock().unwrap().user_create_calls
    }

    pub fn progress_create_calls(&self) -> u32 {
        self.state.lock().unwrap().progress_create_calls
    }
}

fn mint_id(state: &mut State) -> String {
    state.next_id += 1;
    format!("r{}", state.next_id)
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn fetch_user(&self, id: &str) -> Option<User> {
        let state = self.state.lock().unwrap();
        if state.offline {
            return None;
        }
        state.users.get(id).cloned()
    }

    async fn create_user(&self, user: &User) -> Option<User> {
        let mut state = self.state.lock().unwrap();
        state.user_create_calls += 1;
        if state.offline {
            return None;
        }
        state.users.insert(user.id.clone(), user.clone());
        Some(user.clone())
    }

    async fn update_user(&self, patch: &UserPatch) -> Option<User> {
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return None;
        }
        let base = state.users.get(&patch.id).cloned()?;
        let merged = patch.apply_to(base);
        state.users.insert(merged.id.clone(), merged.clone());
        Some(merged)
    }

    async fn list_users(&self) -> Option<Vec<User>> {
        let state = self.state.lock().unwrap();
        if state.offline {
            return None;
        }
        Some(state.users.values().cloned().collect())
    }

    async fn list_progress(&self, filter: &ProgressFilter) -> Option<Vec<Progress>> {
        let state = self.state.lock().unwrap();
        if state.offline {
            return None;
        }
        Some(
            state
                .progress
                .iter()
                .filter(|p| {
                    p.user_id == filter.user_id
                        && filter.module_id.as_deref().is_none_or(|m| p.module_id == m)
                })
                .cloned()
                .collect(),
        )
    }

    async fn create_progress(&self, progress: &Progress) -> Option<Progress> {
        let mut state = self.state.lock().unwrap();
        state.progress_create_calls += 1;
        if state.offline {
            return None;
        }
        let mut created = progress.clone();
        created.id = mint_id(&mut state);
        state.progress.push(created.clone());
        Some(created)
    }

    async fn update_progress(&self, patch: &ProgressPatch) -> Option<Progress> {
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return None;
        }
        let index = state.progress.iter().position(|p| p.id == patch.id)?;
        let merged = patch.apply_to(state.progress[index].clone());
        state.progress[index] = merged.clone();
        Some(merged)
    }

    async fn create_achievement(&self, input: &AchievementInput) -> Option<Achievement> {
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return None;
        }
        let achievement = Achievement {
            id: mint_id(&mut state),
            user_id: input.user_id.clone(),
            title: input.title.clone(),
            module_number: input.module_number,
            created_at: fixed_now(),
        };
        state.achievements.push(achievement.clone());
        Some(achievement)
    }
}
