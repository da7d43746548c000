use std::sync::Arc;

use backend::{FallbackCache, GatewayConfig, HttpGateway, IdentityProvider, RemoteGateway};

use crate::Clock;
use crate::achievement_service::AchievementService;
use crate::completion::CompletionService;
use crate::gate::GateService;
use crate::progress_service::ProgressService;
use crate::user_service::UserService;

/// Assembles the synchronization engine behind one wiring point.
///
/// The fallback cache is constructed here and shared by reference across
/// the services: one last-known-good store per process, injectable as a
/// fresh instance per test.
#[derive(Clone)]
pub struct AppServices {
    users: Arc<UserService>,
    progress: Arc<ProgressService>,
    achievements: Arc<AchievementService>,
    completion: Arc<CompletionService>,
    gate: Arc<GateService>,
}

impl AppServices {
    /// Wires the services over any gateway and identity provider.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        identity: Arc<dyn IdentityProvider>,
        clock: Clock,
    ) -> Self {
        let cache = FallbackCache::new();
        let users = Arc::new(UserService::new(
            Arc::clone(&gateway),
            cache.clone(),
            identity,
        ));
        let progress = Arc::new(ProgressService::new(Arc::clone(&gateway), cache));
        let achievements = Arc::new(AchievementService::new(gateway, clock));
        let completion = Arc::new(CompletionService::new(
            Arc::clone(&users),
            Arc::clone(&progress),
            Arc::clone(&achievements),
            clock,
        ));
        let gate = Arc::new(GateService::new(Arc::clone(&progress)));

        Self {
            users,
            progress,
            achievements,
            completion,
            gate,
        }
    }

    /// Builds services over the HTTP gateway configured from the
    /// environment; `None` when no endpoint is configured.
    #[must_use]
    pub fn from_env(identity: Arc<dyn IdentityProvider>, clock: Clock) -> Option<Self> {
        let config = GatewayConfig::from_env()?;
        let gateway: Arc<dyn RemoteGateway> =
            Arc::new(HttpGateway::new(config, Arc::clone(&identity)));
        Some(Self::new(gateway, identity, clock))
    }

    #[must_use]
    pub fn users(&self) -> Arc<UserService> {
        Arc::clone(&self.users)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn achievements(&self) -> Arc<AchievementService> {
        Arc::clone(&self.achievements)
    }

    #[must_use]
    pub fn completion(&self) -> Arc<CompletionService> {
        Arc::clone(&self.completion)
    }

    #[must_use]
    pub fn gate(&self) -> Arc<GateService> {
        Arc::clone(&self.gate)
    }
}
