//! Redirect resolution.
//!
//! # Responsibilities
//! - Probe the registry for the exact path
//! - On miss, probe each single-segment wildcard variant, leftmost first
//! - Fill the destination's wildcard slot with the matched segment
//! - Return the redirect or an explicit NotFound
//!
//! # Design Decisions
//! - All probes of one resolution share a single read snapshot
//! - Holds no mutable state; shared across request tasks via `Arc`
//! - Empty stored values count as absent
//! - O(n) probes for an n-segment path
//! - Never retries; store errors go straight back to the caller

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::observability::metrics;
use crate::routing::matcher::{normalize, PathSegments};
use crate::routing::template::DestinationTemplate;
use crate::store::{ReadTxn, RegistryStore, RegistryStoreExt, StoreError};

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Redirect),
    NotFound,
}

impl Resolution {
    pub fn destination(&self) -> Option<&str> {
        match self {
            Resolution::Found(redirect) => Some(&redirect.destination),
            Resolution::NotFound => None,
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            Resolution::Found(Redirect { wildcard: None, .. }) => "exact",
            Resolution::Found(_) => "wildcard",
            Resolution::NotFound => "not_found",
        }
    }
}

/// A resolved redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub destination: String,
    /// Present when the path matched through a wildcard key.
    pub wildcard: Option<WildcardMatch>,
}

/// Details of a wildcard hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildcardMatch {
    /// Stored key that matched, e.g. `team/%s`.
    pub key: String,
    /// Index of the wildcard segment.
    pub position: usize,
    /// Original request segment at that position.
    pub segment: String,
}

/// Resolves request paths against the registry store.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn RegistryStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Resolve a request path. A single leading `/` is ignored.
    pub fn resolve(&self, path: &str) -> Result<Resolution, StoreError> {
        let start = Instant::now();
        let path = normalize(path);

        let result = self.store.view(|txn| resolve_in(txn, path));

        match &result {
            Ok(resolution) => {
                tracing::debug!(path, outcome = resolution.outcome(), "Resolved path");
                metrics::record_resolution(resolution.outcome(), start);
            }
            Err(e) => {
                tracing::error!(path, error = %e, "Resolution failed");
                metrics::record_resolution("error", start);
            }
        }
        result
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

/// Resolve a normalized path inside an open read transaction.
pub fn resolve_in(txn: &dyn ReadTxn, path: &str) -> Result<Resolution, StoreError> {
    if let Some(destination) = present(txn.get(path)?) {
        return Ok(Resolution::Found(Redirect {
            destination,
            wildcard: None,
        }));
    }

    let segments = PathSegments::split(path);
    for candidate in segments.wildcard_keys() {
        let Some(stored) = present(txn.get(candidate.as_str())?) else {
            continue;
        };
        let position = candidate.position();
        let segment = segments.get(position).unwrap_or_default();
        let destination = DestinationTemplate::parse(&stored).render(segment);
        return Ok(Resolution::Found(Redirect {
            destination,
            wildcard: Some(WildcardMatch {
                key: candidate.into_string(),
                position,
                segment: segment.to_owned(),
            }),
        }));
    }

    Ok(Resolution::NotFound)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
