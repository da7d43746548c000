use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::warn;

use trilha_core::model::{Achievement, AchievementInput, Progress, ProgressPatch, User, UserPatch};

use crate::config::{AuthMode, GatewayConfig};
use crate::gateway::{ProgressFilter, RemoteGateway};
use crate::identity::IdentityProvider;

//
// ─── RESPONSE ENVELOPE ─────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(default)]
    message: String,
}

//
// ─── HTTP GATEWAY ──────────────────────────────────────────────────────────────
//

/// Request/response gateway to the remote backend.
///
/// Swallows every failure class (transport, non-2xx, error envelope,
/// malformed payload) into a logged `None`, per the `RemoteGateway`
/// contract. No retries, no backoff: a failed call falls through to the
/// caller's fallback exactly once.
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
    identity: Arc<dyn IdentityProvider>,
}

impl HttpGateway {
    #[must_use]
    pub fn new(config: GatewayConfig, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            client: Client::new(),
            config,
            identity,
        }
    }

    /// Runs one named operation and returns its payload from the response
    /// envelope, or `None` on any failure.
    async fn execute(&self, operation: &str, variables: Value) -> Option<Value> {
        let body = json!({ "query": operation, "variables": variables });
        let request = self.client.post(&self.config.endpoint).json(&body);

        // Prefer the caller's live credential when the auth mode allows it;
        // otherwise fall back to the static API key.
        let bearer = match self.config.auth_mode {
            AuthMode::UserPool => self.identity.current().and_then(|c| c.bearer_token),
            AuthMode::ApiKey => None,
        };
        let request = match bearer {
            Some(token) => request.bearer_auth(token),
            None => request.header("x-api-key", &self.config.api_key),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(operation, error = %err, "remote call failed to send");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(operation, status = %status, "remote call rejected");
            return None;
        }

        let envelope: Envelope = match response.json().await {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(operation, error = %err, "remote response was not a valid envelope");
                return None;
            }
        };

        if let Some(first) = envelope.errors.first() {
            warn!(
                operation,
                count = envelope.errors.len(),
                message = %first.message,
                "remote returned errors"
            );
            return None;
        }

        let payload = envelope.data?.get(operation).cloned()?;
        if payload.is_null() {
            return None;
        }
        Some(payload)
    }

    async fn run<T: DeserializeOwned>(&self, operation: &str, variables: Value) -> Option<T> {
        let payload = self.execute(operation, variables).await?;
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(operation, error = %err, "remote payload failed to decode");
                None
            }
        }
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_user(&self, id: &str) -> Option<User> {
        self.run("getUser", json!({ "id": id })).await
    }

    async fn create_user(&self, user: &User) -> Option<User> {
        self.run("createUser", json!({ "input": user })).await
    }

    async fn update_user(&self, patch: &UserPatch) -> Option<User> {
        self.run("updateUser", json!({ "input": patch })).await
    }

    async fn list_users(&self) -> Option<Vec<User>> {
        self.run("listUsers", json!({})).await
    }

    async fn list_progress(&self, filter: &ProgressFilter) -> Option<Vec<Progress>> {
        self.run("listProgresses", json!({ "filter": filter })).await
    }

    async fn create_progress(&self, progress: &Progress) -> Option<Progress> {
        self.run("createProgress", json!({ "input": progress })).await
    }

    async fn update_progress(&self, patch: &ProgressPatch) -> Option<Progress> {
        self.run("updateProgress", json!({ "input": patch })).await
    }

    async fn create_achievement(&self, input: &AchievementInput) -> Option<Achievement> {
        self.run("createAchievement", json!({ "input": input })).await
    }
}
