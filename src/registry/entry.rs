//! Redirect entries and write-time validation.

use serde::{Deserialize, Serialize};

use crate::routing::matcher::WILDCARD_TOKEN;
use crate::routing::template::{slot_count, DestinationTemplate};

/// One source → destination mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectEntry {
    pub source: String,
    #[serde(default)]
    pub destination: String,
}

impl RedirectEntry {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Strip a single leading `/` from the source, the way request paths
    /// are normalized before lookup.
    pub fn normalized(mut self) -> Self {
        if let Some(stripped) = self.source.strip_prefix('/') {
            self.source = stripped.to_owned();
        }
        self
    }

    /// Whether the source is a wildcard key.
    pub fn is_wildcard(&self) -> bool {
        self.source.split('/').any(|segment| segment == WILDCARD_TOKEN)
    }
}

/// Reasons an entry is refused on write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedEntry {
    #[error("source must not be empty")]
    EmptySource,

    #[error("source {key:?} uses %s inside a segment; the wildcard must be a whole segment")]
    PartialWildcard { key: String },

    #[error("source {key:?} has more than one wildcard segment")]
    MultipleWildcards { key: String },

    #[error("destination for {key:?} must not be empty")]
    EmptyDestination { key: String },

    #[error("destination {destination:?} has more than one %s")]
    MultipleSlots { destination: String },

    #[error("destination {destination:?} is not an absolute URL: {reason}")]
    InvalidUrl { destination: String, reason: String },
}

/// Check an entry before it is stored.
pub fn validate(entry: &RedirectEntry) -> Result<(), MalformedEntry> {
    validate_source(&entry.source)?;

    if entry.destination.is_empty() {
        return Err(MalformedEntry::EmptyDestination {
            key: entry.source.clone(),
        });
    }
    if slot_count(&entry.destination) > 1 {
        return Err(MalformedEntry::MultipleSlots {
            destination: entry.destination.clone(),
        });
    }

    // Check the URL as it will be served, with a sample segment in the slot.
    let sample = DestinationTemplate::parse(&entry.destination).render("x");
    url::Url::parse(&sample).map_err(|e| MalformedEntry::InvalidUrl {
        destination: entry.destination.clone(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Check a source key on its own (used by deletes as well as puts).
pub fn validate_source(source: &str) -> Result<(), MalformedEntry> {
    if source.is_empty() {
        return Err(MalformedEntry::EmptySource);
    }

    let mut wildcards = 0;
    for segment in source.split('/') {
        if segment == WILDCARD_TOKEN {
            wildcards += 1;
        } else if segment.contains(WILDCARD_TOKEN) {
            return Err(MalformedEntry::PartialWildcard {
                key: source.to_owned(),
            });
        }
    }
    if wildcards > 1 {
        return Err(MalformedEntry::MultipleWildcards {
            key: source.to_owned(),
        });
    }
    Ok(())
}
