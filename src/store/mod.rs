//! Registry storage subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver / Registry
//!     → RegistryStore::read  (snapshot, many concurrent readers)
//!     → RegistryStore::write (exclusive, commit-or-abort)
//!     → backend: lmdb.rs (durable) | memory.rs (in-process)
//! ```
//!
//! # Design Decisions
//! - One logical table, `redirects`, string keys to string values
//! - The trait is object-safe so the store is shared as `Arc<dyn RegistryStore>`
//! - A transaction body returning `Err` aborts; nothing it wrote is visible
//! - `scan` yields entries in byte-wise key order

pub mod lmdb;
pub mod memory;

use std::path::PathBuf;

pub use lmdb::LmdbStore;
pub use memory::MemoryStore;

/// Name of the table holding source → destination entries.
pub const REDIRECTS_TABLE: &str = "redirects";

/// Errors raised by a registry store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be opened or initialised.
    #[error("registry store at {path} is unavailable: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// A transaction failed mid-flight and was rolled back.
    #[error("registry transaction failed: {0}")]
    Io(String),

    /// Keys must hold at least one byte.
    #[error("registry keys must not be empty")]
    EmptyKey,

    /// The transaction body declined to commit.
    #[error("registry transaction aborted")]
    Aborted,
}

impl From<heed3::Error> for StoreError {
    fn from(err: heed3::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// Operations available inside any transaction.
pub trait ReadTxn {
    /// Look up a key. `None` when the key is not stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Every stored pair, ordered by key.
    fn scan(&self) -> Result<Vec<(String, String)>, StoreError>;
}

/// Operations available inside a read-write transaction.
pub trait WriteTxn: ReadTxn {
    /// Insert or overwrite a key. Empty keys are rejected with
    /// [`StoreError::EmptyKey`].
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Returns whether it existed.
    fn delete(&mut self, key: &str) -> Result<bool, StoreError>;
}

/// Transaction body run against a read snapshot.
pub type ReadOp<'a> = dyn FnMut(&dyn ReadTxn) -> Result<(), StoreError> + 'a;

/// Transaction body run with exclusive write access.
pub type WriteOp<'a> = dyn FnMut(&mut dyn WriteTxn) -> Result<(), StoreError> + 'a;

/// A transactional key-value backend for the redirect table.
///
/// Implementations must be safe to share between any number of request
/// tasks. Read transactions observe a consistent snapshot and never see a
/// write transaction that has not committed. Write transactions are
/// serialized and all-or-nothing.
pub trait RegistryStore: Send + Sync {
    /// Run `op` against a read-only snapshot.
    fn read(&self, op: &mut ReadOp<'_>) -> Result<(), StoreError>;

    /// Run `op` in a read-write transaction. Commits when `op` returns `Ok`,
    /// rolls back otherwise. Committed writes are durable on return.
    fn write(&self, op: &mut WriteOp<'_>) -> Result<(), StoreError>;
}

/// Value-returning helpers over [`RegistryStore`].
///
/// Bodies may fail with any error type that can absorb a [`StoreError`];
/// a body error aborts the transaction and is returned unchanged.
pub trait RegistryStoreExt: RegistryStore {
    fn view<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut body = Some(f);
        let mut outcome: Option<Result<R, E>> = None;
        let result = self.read(&mut |txn: &dyn ReadTxn| {
            let Some(body) = body.take() else {
                return Ok(());
            };
            let res = body(txn);
            let failed = res.is_err();
            outcome = Some(res);
            if failed {
                Err(StoreError::Aborted)
            } else {
                Ok(())
            }
        });
        settle(result, outcome)
    }

    fn update<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut body = Some(f);
        let mut outcome: Option<Result<R, E>> = None;
        let result = self.write(&mut |txn: &mut dyn WriteTxn| {
            let Some(body) = body.take() else {
                return Ok(());
            };
            let res = body(txn);
            let failed = res.is_err();
            outcome = Some(res);
            if failed {
                Err(StoreError::Aborted)
            } else {
                Ok(())
            }
        });
        settle(result, outcome)
    }
}

impl<S: RegistryStore + ?Sized> RegistryStoreExt for S {}

/// Body errors take precedence; a commit failure overrides a body success.
fn settle<R, E: From<StoreError>>(
    result: Result<(), StoreError>,
    outcome: Option<Result<R, E>>,
) -> Result<R, E> {
    match (result, outcome) {
        (_, Some(Err(err))) => Err(err),
        (Err(err), _) => Err(err.into()),
        (Ok(()), Some(Ok(value))) => Ok(value),
        (Ok(()), None) => Err(StoreError::Aborted.into()),
    }
}
