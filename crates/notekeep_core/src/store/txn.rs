//! Read and write transactions over the committed snapshot.
//!
//! # Responsibility
//! - Give readers a stable view of the state committed at open time.
//! - Buffer writes privately until an atomic commit publishes them.
//!
//! # Invariants
//! - `WriteTxn` holds the store's writer slot for its whole lifetime.
//! - `commit()` swaps the committed snapshot in one atomic step; abort or
//!   drop publishes nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::MutexGuard;

use super::schema::{Schema, TableDef};
use super::{Key, Record, Store, StoreError, StoreResult};

/// Per-table rows plus index maps, keyed by primary key.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableState {
    rows: BTreeMap<Key, Arc<Record>>,
    indexes: HashMap<String, BTreeMap<Key, BTreeSet<Key>>>,
}

impl TableState {
    fn empty(def: &TableDef) -> Self {
        let indexes = def
            .indexes
            .iter()
            .map(|idx| (idx.name.clone(), BTreeMap::new()))
            .collect();
        Self {
            rows: BTreeMap::new(),
            indexes,
        }
    }

    /// True when `key` already maps to a record other than `id` on a
    /// unique index.
    fn unique_conflict(&self, index: &str, key: &Key, id: &Key) -> bool {
        self.indexes
            .get(index)
            .and_then(|map| map.get(key))
            .is_some_and(|ids| ids.iter().any(|existing| existing != id))
    }

    fn remove_row(&mut self, def: &TableDef, id: &Key) -> Option<Arc<Record>> {
        let row = self.rows.remove(id)?;
        for idx in &def.indexes {
            let Some(value) = row.get(&idx.field) else {
                continue;
            };
            let Some(key) = Key::from_field(value) else {
                continue;
            };
            if let Some(map) = self.indexes.get_mut(&idx.name) {
                if let Some(ids) = map.get_mut(&key) {
                    ids.remove(id);
                    if ids.is_empty() {
                        map.remove(&key);
                    }
                }
            }
        }
        Some(row)
    }

    fn insert_row(&mut self, def: &TableDef, id: Key, record: Record) {
        let row = Arc::new(record);
        for idx in &def.indexes {
            let Some(value) = row.get(&idx.field) else {
                continue;
            };
            let Some(key) = Key::from_field(value) else {
                continue;
            };
            self.indexes
                .entry(idx.name.clone())
                .or_default()
                .entry(key)
                .or_default()
                .insert(id.clone());
        }
        self.rows.insert(id, row);
    }
}

/// Full committed (or in-progress) state of every table.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    tables: HashMap<String, TableState>,
}

impl Snapshot {
    pub(crate) fn empty(schema: &Schema) -> Self {
        let tables = schema
            .tables
            .iter()
            .map(|def| (def.name.clone(), TableState::empty(def)))
            .collect();
        Self { tables }
    }

    fn lookup<'a>(
        &'a self,
        schema: &'a Schema,
        table: &str,
        index: &str,
    ) -> StoreResult<(&'a TableDef, &'a TableState, &'a str)> {
        let def = schema.get(table)?;
        let idx = def
            .index_def(index)
            .ok_or_else(|| StoreError::UnknownIndex {
                table: table.to_string(),
                index: index.to_string(),
            })?;
        let state = self
            .tables
            .get(&def.name)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        Ok((def, state, idx.name.as_str()))
    }

    fn get_first(
        &self,
        schema: &Schema,
        table: &str,
        index: &str,
        key: &Key,
    ) -> StoreResult<Option<Record>> {
        let (_, state, index) = self.lookup(schema, table, index)?;
        let record = state
            .indexes
            .get(index)
            .and_then(|map| map.get(key))
            .and_then(|ids| ids.iter().next())
            .and_then(|id| state.rows.get(id))
            .map(|row| (**row).clone());
        Ok(record)
    }

    fn get_all(
        &self,
        schema: &Schema,
        table: &str,
        index: &str,
        key: &Key,
    ) -> StoreResult<Vec<Record>> {
        let (_, state, index) = self.lookup(schema, table, index)?;
        let records = state
            .indexes
            .get(index)
            .and_then(|map| map.get(key))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.rows.get(id))
                    .map(|row| (**row).clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }
}

/// Snapshot-isolated read transaction.
///
/// Holds an `Arc` to the snapshot taken at open time; never blocks the
/// writer. Closed by dropping.
pub struct ReadTxn<'s> {
    store: &'s Store,
    snapshot: Arc<Snapshot>,
}

impl<'s> ReadTxn<'s> {
    pub(crate) fn new(store: &'s Store, snapshot: Arc<Snapshot>) -> Self {
        Self { store, snapshot }
    }

    /// Point lookup: the first record whose `index` field equals `key`.
    ///
    /// `Ok(None)` means no match; errors are reserved for unknown
    /// table/index names.
    pub fn get_first(&self, table: &str, index: &str, key: &Key) -> StoreResult<Option<Record>> {
        self.snapshot.get_first(&self.store.schema, table, index, key)
    }

    /// All records whose `index` field equals `key`, in primary-key order.
    pub fn get_all(&self, table: &str, index: &str, key: &Key) -> StoreResult<Vec<Record>> {
        self.snapshot.get_all(&self.store.schema, table, index, key)
    }
}

/// The single writable transaction.
///
/// Owns the writer slot until committed, aborted, or dropped. Reads issued
/// through it see the transaction's own uncommitted writes.
pub struct WriteTxn<'s> {
    store: &'s Store,
    working: Snapshot,
    _slot: MutexGuard<'s, ()>,
}

impl<'s> WriteTxn<'s> {
    pub(crate) fn new(store: &'s Store, slot: MutexGuard<'s, ()>, working: Snapshot) -> Self {
        Self {
            store,
            working,
            _slot: slot,
        }
    }

    /// Inserts a record, replacing any record with the same primary key.
    ///
    /// # Errors
    /// - `ConstraintViolation` when a unique index maps the record's key to
    ///   a different record. The transaction stays usable and the rejected
    ///   record leaves no trace, even on a later `commit()`.
    /// - `MissingIndexField`/`UnindexableField` when the record cannot
    ///   satisfy the table's index declarations.
    pub fn insert(&mut self, table: &str, record: Record) -> StoreResult<()> {
        let store = self.store;
        let def = store.schema.get(table)?;

        let mut keys: Vec<(&str, bool, Key)> = Vec::with_capacity(def.indexes.len());
        for idx in &def.indexes {
            let value = record
                .get(&idx.field)
                .ok_or_else(|| StoreError::MissingIndexField {
                    table: table.to_string(),
                    field: idx.field.clone(),
                })?;
            let key = Key::from_field(value).ok_or_else(|| StoreError::UnindexableField {
                table: table.to_string(),
                field: idx.field.clone(),
            })?;
            keys.push((idx.name.as_str(), idx.unique, key));
        }

        let id = record
            .get(&def.primary().field)
            .and_then(Key::from_field)
            .ok_or_else(|| StoreError::MissingIndexField {
                table: table.to_string(),
                field: def.primary().field.clone(),
            })?;

        let state = self
            .working
            .tables
            .get_mut(&def.name)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;

        for (name, unique, key) in &keys {
            if *unique && state.unique_conflict(name, key, &id) {
                return Err(StoreError::ConstraintViolation {
                    table: table.to_string(),
                    index: (*name).to_string(),
                });
            }
        }

        state.remove_row(def, &id);
        state.insert_row(def, id, record);
        Ok(())
    }

    /// Deletes the record with the given primary key.
    ///
    /// # Errors
    /// - `NotFound` when no record has that key.
    pub fn delete(&mut self, table: &str, id: &Key) -> StoreResult<()> {
        let store = self.store;
        let def = store.schema.get(table)?;
        let state = self
            .working
            .tables
            .get_mut(&def.name)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        state
            .remove_row(def, id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
            })
    }

    /// Point lookup against the working state, own writes included.
    pub fn get_first(&self, table: &str, index: &str, key: &Key) -> StoreResult<Option<Record>> {
        self.working.get_first(&self.store.schema, table, index, key)
    }

    /// Range lookup against the working state, own writes included.
    pub fn get_all(&self, table: &str, index: &str, key: &Key) -> StoreResult<Vec<Record>> {
        self.working.get_all(&self.store.schema, table, index, key)
    }

    /// Publishes every buffered write in one atomic snapshot swap.
    pub fn commit(self) {
        let Self {
            store,
            working,
            _slot,
        } = self;
        *store.committed.write() = Arc::new(working);
    }

    /// Discards every buffered write. Equivalent to dropping.
    pub fn abort(self) {}
}
