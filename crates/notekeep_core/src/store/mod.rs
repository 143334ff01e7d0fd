//! In-memory schema-indexed transactional table store.
//!
//! # Responsibility
//! - Hold all user/note records for the process lifetime.
//! - Provide snapshot-isolated read transactions and a single serialized
//!   write transaction with atomic commit/abort.
//! - Enforce unique-index constraints at insert time.
//!
//! # Invariants
//! - Readers never block the writer and never observe uncommitted writes.
//! - At most one write transaction is in flight; the store is the only
//!   mutual-exclusion point in the process.
//! - A failed insert leaves the transaction usable and the record invisible.

mod schema;
mod txn;

pub use schema::{IndexDef, Schema, TableDef};
pub use txn::{ReadTxn, WriteTxn};

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use txn::Snapshot;

pub type StoreResult<T> = Result<T, StoreError>;

/// A table record: a JSON object keyed by field name.
///
/// Records are schema-free beyond the fields named by the table's indexes,
/// which must be present and hold a string or integer value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Index key extracted from a record field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Extracts an index key from a record field value.
    ///
    /// Only strings and integers are indexable.
    pub(crate) fn from_field(value: &serde_json::Value) -> Option<Key> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(Key::Int),
            serde_json::Value::String(s) => Some(Key::Str(s.clone())),
            _ => None,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Store-level operation error.
#[derive(Debug)]
pub enum StoreError {
    /// Insert collided with an existing record on a unique index.
    ConstraintViolation { table: String, index: String },
    /// Delete targeted a record that does not exist.
    NotFound { table: String },
    /// Operation referenced a table the schema does not declare.
    UnknownTable(String),
    /// Operation referenced an index the table does not declare.
    UnknownIndex { table: String, index: String },
    /// Inserted record is missing a field required by an index.
    MissingIndexField { table: String, field: String },
    /// Indexed field holds a value that is neither string nor integer.
    UnindexableField { table: String, field: String },
    /// Schema rejected at store construction.
    InvalidSchema(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstraintViolation { table, index } => {
                write!(f, "unique index violation on `{table}.{index}`")
            }
            Self::NotFound { table } => write!(f, "record not found in `{table}`"),
            Self::UnknownTable(table) => write!(f, "unknown table `{table}`"),
            Self::UnknownIndex { table, index } => {
                write!(f, "unknown index `{index}` on table `{table}`")
            }
            Self::MissingIndexField { table, field } => {
                write!(f, "record for `{table}` is missing indexed field `{field}`")
            }
            Self::UnindexableField { table, field } => {
                write!(f, "field `{field}` of `{table}` is not a string or integer")
            }
            Self::InvalidSchema(reason) => write!(f, "invalid schema: {reason}"),
        }
    }
}

impl Error for StoreError {}

/// The shared in-memory store.
///
/// Cheap to share behind an `Arc`; all interior mutability lives here.
pub struct Store {
    schema: Schema,
    committed: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
}

impl Store {
    /// Creates an empty store for the given schema.
    ///
    /// # Errors
    /// - Returns `InvalidSchema` when a table lacks a unique `id` index or
    ///   declares duplicate table/index names.
    pub fn new(schema: Schema) -> StoreResult<Self> {
        schema.validate()?;
        let snapshot = Snapshot::empty(&schema);
        Ok(Self {
            schema,
            committed: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
        })
    }

    /// Opens a read transaction over the committed state at this instant.
    ///
    /// The returned transaction keeps seeing that state even while later
    /// writes commit. Dropping it closes it.
    pub fn read(&self) -> ReadTxn<'_> {
        let snapshot = self.committed.read().clone();
        ReadTxn::new(self, snapshot)
    }

    /// Opens the writable transaction, blocking until the writer slot frees.
    ///
    /// Writes stay private to the transaction until `commit()`; dropping or
    /// calling `abort()` discards them all.
    pub fn write(&self) -> WriteTxn<'_> {
        let slot = self.writer.lock();
        let working = (**self.committed.read()).clone();
        WriteTxn::new(self, slot, working)
    }
}
