//! Store bootstrap and table layout.
//!
//! # Responsibility
//! - Declare the canonical `user`/`notes` table layout.
//! - Open an empty store instance with that layout applied.
//!
//! # Invariants
//! - `user.email` is a unique index; duplicate sign-ups must fail at insert.
//! - Every store instance is independent; tests build their own.

use log::{error, info};

use crate::store::{IndexDef, Schema, Store, StoreResult, TableDef};

/// Name of the user accounts table.
pub const TABLE_USER: &str = "user";
/// Name of the notes table.
pub const TABLE_NOTES: &str = "notes";

/// The canonical table layout.
pub fn default_schema() -> Schema {
    Schema::new()
        .table(
            TableDef::new(TABLE_USER)
                .index(IndexDef::unique("id", "id"))
                .index(IndexDef::non_unique("name", "name"))
                .index(IndexDef::unique("email", "email"))
                .index(IndexDef::non_unique("password", "password")),
        )
        .table(
            TableDef::new(TABLE_NOTES)
                .index(IndexDef::unique("id", "id"))
                .index(IndexDef::non_unique("note", "note"))
                .index(IndexDef::non_unique("created_by", "created_by")),
        )
}

/// Opens an empty store with the canonical layout.
///
/// # Side effects
/// - Emits `store_open` logging events with status.
pub fn open_store() -> StoreResult<Store> {
    match Store::new(default_schema()) {
        Ok(store) => {
            info!("event=store_open module=db status=ok");
            Ok(store)
        }
        Err(err) => {
            error!("event=store_open module=db status=error error={err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::open_store;

    #[test]
    fn canonical_layout_is_valid() {
        open_store().unwrap();
    }
}
