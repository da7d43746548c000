//! Identity is an external collaborator: something that yields the current
//! caller and, optionally, a live bearer credential. This crate never
//! authenticates anyone itself.

/// The current caller as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerIdentity {
    /// Stable id owned by the identity provider, never generated here.
    pub user_id: String,
    /// Display name claim, when the token carries one.
    pub name: Option<String>,
    /// Email claim, when the token carries one.
    pub email: Option<String>,
    /// Live bearer token for authenticated remote calls.
    pub bearer_token: Option<String>,
}

pub trait IdentityProvider: Send + Sync {
    /// The caller of record, or `None` when no session is active.
    fn current(&self) -> Option<CallerIdentity>;
}

/// Fixed identity for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    identity: Option<CallerIdentity>,
}

impl StaticIdentity {
    /// Always reports the given caller.
    #[must_use]
    pub fn new(identity: CallerIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Reports no active session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { identity: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current(&self) -> Option<CallerIdentity> {
        self.identity.clone()
    }
}
