//! Administrative access to the redirect registry.
//!
//! # Data Flow
//! ```text
//! Edit UI / admin API / CSV import
//!     → entry.rs (normalize, validate)
//!     → Registry (one write transaction per operation)
//!     → RegistryStore
//! ```
//!
//! # Design Decisions
//! - Validation happens here, on write; the resolver trusts stored data
//! - Deleting is key removal, never an empty value
//! - Saving an empty destination deletes the source
//! - Bulk imports are a single transaction: all entries or none

pub mod entry;
pub mod import;

use std::sync::Arc;

use crate::observability::metrics;
use crate::store::{RegistryStore, RegistryStoreExt, StoreError};

pub use entry::{validate, MalformedEntry, RedirectEntry};
pub use import::{parse_records, ImportError};

/// Errors from administrative registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Malformed(#[from] MalformedEntry),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Stored,
    Deleted { existed: bool },
}

/// Validated read/write access to the registry store.
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn RegistryStore>,
}

impl Registry {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Stored destination for `source`, if any. Empty values read as absent.
    pub fn get(&self, source: &str) -> Result<Option<String>, RegistryError> {
        let source = source.strip_prefix('/').unwrap_or(source);
        let value = self.store.view(|txn| txn.get(source))?;
        Ok(value.filter(|v: &String| !v.is_empty()))
    }

    /// Validate and store an entry, overwriting any previous destination.
    pub fn put(&self, entry: RedirectEntry) -> Result<(), RegistryError> {
        let entry = entry.normalized();
        validate(&entry)?;

        self.store
            .update(|txn| txn.put(&entry.source, &entry.destination))?;

        metrics::record_registry_write("put");
        tracing::info!(
            source = %entry.source,
            destination = %entry.destination,
            "Redirect stored"
        );
        Ok(())
    }

    /// Remove `source`. Returns whether it existed.
    pub fn delete(&self, source: &str) -> Result<bool, RegistryError> {
        let source = source.strip_prefix('/').unwrap_or(source);
        if source.is_empty() {
            return Err(MalformedEntry::EmptySource.into());
        }

        let existed = self.store.update(|txn| txn.delete(source))?;

        metrics::record_registry_write("delete");
        tracing::info!(source, existed, "Redirect deleted");
        Ok(existed)
    }

    /// Save from the edit surface: an empty destination deletes the source,
    /// anything else is a validated put.
    pub fn save(&self, entry: RedirectEntry) -> Result<SaveOutcome, RegistryError> {
        if entry.destination.is_empty() {
            let existed = self.delete(&entry.source)?;
            return Ok(SaveOutcome::Deleted { existed });
        }
        self.put(entry)?;
        Ok(SaveOutcome::Stored)
    }

    /// Every entry in key order. Empty values read as absent, as in `get`.
    pub fn list(&self) -> Result<Vec<RedirectEntry>, RegistryError> {
        let pairs = self.store.view(|txn| txn.scan())?;
        Ok(pairs
            .into_iter()
            .filter(|(_, destination)| !destination.is_empty())
            .map(|(source, destination)| RedirectEntry {
                source,
                destination,
            })
            .collect())
    }

    /// Validate and store many entries in one transaction.
    ///
    /// Any malformed entry rejects the whole batch before anything is
    /// written. Returns the number of entries stored.
    pub fn import(&self, entries: Vec<RedirectEntry>) -> Result<usize, RegistryError> {
        let entries: Vec<RedirectEntry> = entries.into_iter().map(RedirectEntry::normalized).collect();
        for entry in &entries {
            validate(entry)?;
        }

        let count = self.store.update(|txn| {
            for entry in &entries {
                txn.put(&entry.source, &entry.destination)?;
            }
            Ok::<_, StoreError>(entries.len())
        })?;

        metrics::record_registry_write("import");
        tracing::info!(count, "Redirects imported");
        Ok(count)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}
