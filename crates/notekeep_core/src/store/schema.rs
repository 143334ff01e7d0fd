//! Table and index declarations for the store.
//!
//! # Responsibility
//! - Describe tables and their indexes up front, before any data exists.
//! - Validate structural requirements at store construction.
//!
//! # Invariants
//! - Every table declares a unique index named `id`; its field is the
//!   record's primary key.

use super::{StoreError, StoreResult};

/// One named index over a record field.
#[derive(Debug, Clone)]
pub struct IndexDef {
    pub(crate) name: String,
    pub(crate) field: String,
    pub(crate) unique: bool,
}

impl IndexDef {
    /// Declares a unique index: at most one record per key.
    pub fn unique(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            unique: true,
        }
    }

    /// Declares a non-unique index: any number of records per key.
    pub fn non_unique(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            unique: false,
        }
    }
}

/// One table declaration.
#[derive(Debug, Clone)]
pub struct TableDef {
    pub(crate) name: String,
    pub(crate) indexes: Vec<IndexDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: Vec::new(),
        }
    }

    /// Adds an index declaration, builder style.
    #[must_use]
    pub fn index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    pub(crate) fn index_def(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|idx| idx.name == name)
    }

    /// The `id` index definition. Valid after `Schema::validate`.
    pub(crate) fn primary(&self) -> &IndexDef {
        // validate() guarantees presence; the fallback keeps this total.
        self.index_def("id").unwrap_or(&self.indexes[0])
    }
}

/// Full table layout for one store instance.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) tables: Vec<TableDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table declaration, builder style.
    #[must_use]
    pub fn table(mut self, table: TableDef) -> Self {
        self.tables.push(table);
        self
    }

    pub(crate) fn get(&self, name: &str) -> StoreResult<&TableDef> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    pub(crate) fn validate(&self) -> StoreResult<()> {
        if self.tables.is_empty() {
            return Err(StoreError::InvalidSchema("no tables declared".into()));
        }
        for table in &self.tables {
            if self.tables.iter().filter(|t| t.name == table.name).count() > 1 {
                return Err(StoreError::InvalidSchema(format!(
                    "duplicate table `{}`",
                    table.name
                )));
            }
            match table.index_def("id") {
                Some(idx) if idx.unique => {}
                Some(_) => {
                    return Err(StoreError::InvalidSchema(format!(
                        "table `{}` declares a non-unique `id` index",
                        table.name
                    )))
                }
                None => {
                    return Err(StoreError::InvalidSchema(format!(
                        "table `{}` has no `id` index",
                        table.name
                    )))
                }
            }
            for index in &table.indexes {
                if table
                    .indexes
                    .iter()
                    .filter(|idx| idx.name == index.name)
                    .count()
                    > 1
                {
                    return Err(StoreError::InvalidSchema(format!(
                        "duplicate index `{}` on table `{}`",
                        index.name, table.name
                    )));
                }
            }
        }
        Ok(())
    }
}
