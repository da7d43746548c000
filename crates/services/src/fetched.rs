//! Provenance-tagged results.
//!
//! Every repository read or write resolves to a value plus where it came
//! from, so callers (and tests) can tell "fresh from the backend" apart
//! from "last known, possibly outdated" instead of guessing behind an
//! opaque optional. "Nothing available at all" stays `Option::None`.

/// Where a value was materialized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Straight from a successful remote call.
    Remote,
    /// From the fallback cache (or synthesized locally) after the remote
    /// call failed; may be stale and may never have been persisted.
    Cache,
}

/// A value together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Fetched<T> {
    #[must_use]
    pub fn remote(value: T) -> Self {
        Self {
            value,
            source: Source::Remote,
        }
    }

    #[must_use]
    pub fn cached(value: T) -> Self {
        Self {
            value,
            source: Source::Cache,
        }
    }

    /// True when the value reflects the backend's current state.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.source == Source::Remote
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}
