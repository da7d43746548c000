use std::env;

/// How the gateway authenticates against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Prefer the caller's live bearer token; fall back to the API key
    /// when no session is active.
    #[default]
    UserPool,
    /// Always send the static API key.
    ApiKey,
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub api_key: String,
    pub auth_mode: AuthMode,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, auth_mode: AuthMode) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            auth_mode,
        }
    }

    /// Reads `TRILHA_API_URL`, `TRILHA_API_KEY` and `TRILHA_AUTH_MODE`.
    ///
    /// Returns `None` without an endpoint; the key defaults to empty and
    /// the mode to `UserPool`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("TRILHA_API_URL").ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }
        let api_key = env::var("TRILHA_API_KEY").unwrap_or_default();
        let auth_mode = match env::var("TRILHA_AUTH_MODE").as_deref() {
            Ok("api_key") => AuthMode::ApiKey,
            _ => AuthMode::UserPool,
        };
        Some(Self {
            endpoint,
            api_key,
            auth_mode,
        })
    }
}
