//! Shared error types for the services crate.
//!
//! Remote availability failures never surface here: the gateway swallows
//! them into `None` and the services fall back to the cache. The only
//! error a caller can see is a logical-state failure.

use thiserror::Error;

/// Errors emitted by `CompletionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompletionError {
    /// The user exists in neither the backend nor the cache; there is no
    /// base object to apply the aggregate update to.
    #[error("user {0} is unknown to both the backend and the cache")]
    UserUnavailable(String),
}
