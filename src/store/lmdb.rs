//! Durable registry store backed by LMDB.
//!
//! # Responsibilities
//! - Open (or create) the environment directory and the `redirects` table
//! - Map LMDB read transactions onto snapshot reads
//! - Map the single LMDB writer onto serialized, synced commits
//!
//! # Design Decisions
//! - LMDB already provides MVCC snapshots and one writer at a time, so no
//!   extra locking lives here
//! - A dropped write transaction is an abort; only `commit` publishes
//! - LMDB rejects zero-length keys, so empty keys are short-circuited

use std::fs;
use std::path::{Path, PathBuf};

use heed3::types::Str;
use heed3::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};

use crate::store::{ReadOp, ReadTxn, RegistryStore, StoreError, WriteOp, WriteTxn, REDIRECTS_TABLE};

/// Default memory map size: 64 MiB.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// LMDB-backed [`RegistryStore`].
pub struct LmdbStore {
    env: Env,
    redirects: Database<Str, Str>,
    path: PathBuf,
}

impl LmdbStore {
    /// Open the store rooted at `path`, creating the directory and the
    /// `redirects` table when missing.
    ///
    /// Any failure here is fatal for the process: a store that cannot be
    /// opened, or whose on-disk state is not a valid environment, reports
    /// [`StoreError::Unavailable`].
    pub fn open(path: impl AsRef<Path>, map_size: usize) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |reason: String| StoreError::Unavailable {
            path: path.clone(),
            reason,
        };

        fs::create_dir_all(&path).map_err(|e| unavailable(e.to_string()))?;

        // SAFETY: the environment is opened once per process for this path and
        // the memory map is never modified outside of heed transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(4)
                .open(&path)
        }
        .map_err(|e| unavailable(e.to_string()))?;

        let mut wtxn = env.write_txn().map_err(|e| unavailable(e.to_string()))?;
        let redirects: Database<Str, Str> = env
            .create_database(&mut wtxn, Some(REDIRECTS_TABLE))
            .map_err(|e| unavailable(e.to_string()))?;
        wtxn.commit().map_err(|e| unavailable(e.to_string()))?;

        tracing::info!(path = %path.display(), map_size, "Registry store opened");

        Ok(Self { env, redirects, path })
    }

    /// Directory holding the environment files.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for LmdbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmdbStore").field("path", &self.path).finish()
    }
}

impl RegistryStore for LmdbStore {
    fn read(&self, op: &mut ReadOp<'_>) -> Result<(), StoreError> {
        let rtxn = self.env.read_txn()?;
        let txn = LmdbReadTxn {
            txn: &rtxn,
            db: self.redirects,
        };
        op(&txn)
    }

    fn write(&self, op: &mut WriteOp<'_>) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn()?;
        let mut txn = LmdbWriteTxn {
            txn: &mut wtxn,
            db: self.redirects,
        };
        // An error drops `wtxn` uncommitted, which aborts it.
        op(&mut txn)?;
        wtxn.commit()?;
        Ok(())
    }
}

struct LmdbReadTxn<'t, 'e> {
    txn: &'t RoTxn<'e>,
    db: Database<Str, Str>,
}

impl ReadTxn for LmdbReadTxn<'_, '_> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        get(self.db, self.txn, key)
    }

    fn scan(&self) -> Result<Vec<(String, String)>, StoreError> {
        scan(self.db, self.txn)
    }
}

struct LmdbWriteTxn<'t, 'e> {
    txn: &'t mut RwTxn<'e>,
    db: Database<Str, Str>,
}

impl ReadTxn for LmdbWriteTxn<'_, '_> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        get(self.db, &*self.txn, key)
    }

    fn scan(&self) -> Result<Vec<(String, String)>, StoreError> {
        scan(self.db, &*self.txn)
    }
}

impl WriteTxn for LmdbWriteTxn<'_, '_> {
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.db.put(&mut *self.txn, key, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
        if key.is_empty() {
            return Ok(false);
        }
        Ok(self.db.delete(&mut *self.txn, key)?)
    }
}

fn get(db: Database<Str, Str>, txn: &RoTxn<'_>, key: &str) -> Result<Option<String>, StoreError> {
    if key.is_empty() {
        return Ok(None);
    }
    Ok(db.get(txn, key)?.map(str::to_owned))
}

fn scan(db: Database<Str, Str>, txn: &RoTxn<'_>) -> Result<Vec<(String, String)>, StoreError> {
    let mut pairs = Vec::new();
    for item in db.iter(txn)? {
        let (key, value) = item?;
        pairs.push((key.to_owned(), value.to_owned()));
    }
    Ok(pairs)
}
