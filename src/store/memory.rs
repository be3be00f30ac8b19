//! In-process registry store.
//!
//! Readers load an immutable snapshot; the writer stages a private copy and
//! publishes it in one swap. Used by tests and by embedders that do not
//! need durability.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::store::{ReadOp, ReadTxn, RegistryStore, StoreError, WriteOp, WriteTxn};

type Table = BTreeMap<String, String>;

/// Memory-backed [`RegistryStore`] with the same transaction contract as
/// the LMDB backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: ArcSwap<Table>,
    writer: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table: Table = entries
            .into_iter()
            .map(|(k, v)| -> (String, String) { (k.into(), v.into()) })
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self {
            snapshot: ArcSwap::from_pointee(table),
            writer: Mutex::new(()),
        }
    }

    /// Number of stored entries in the current snapshot.
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RegistryStore for MemoryStore {
    fn read(&self, op: &mut ReadOp<'_>) -> Result<(), StoreError> {
        let txn = SnapshotTxn {
            table: self.snapshot.load_full(),
        };
        op(&txn)
    }

    fn write(&self, op: &mut WriteOp<'_>) -> Result<(), StoreError> {
        // The lock guards no data; a panicked writer never published.
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut txn = StagedTxn {
            table: Table::clone(&self.snapshot.load()),
        };
        op(&mut txn)?;
        self.snapshot.store(Arc::new(txn.table));
        Ok(())
    }
}

struct SnapshotTxn {
    table: Arc<Table>,
}

impl ReadTxn for SnapshotTxn {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.table.get(key).cloned())
    }

    fn scan(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .table
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

struct StagedTxn {
    table: Table,
}

impl ReadTxn for StagedTxn {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.table.get(key).cloned())
    }

    fn scan(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .table
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl WriteTxn for StagedTxn {
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.table.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.table.remove(key).is_some())
    }
}
