//! Note repository contract and store-backed implementation.
//!
//! # Responsibility
//! - Owner-scoped note listing, note creation, deletion by id.
//!
//! # Invariants
//! - Listing returns an empty vec for "no notes"; failures are errors,
//!   never a silently empty result.
//! - Deletion performs no ownership check; callers own that decision.

use std::sync::Arc;

use log::{debug, warn};

use crate::db::TABLE_NOTES;
use crate::model::{fresh_id, Note, NoteRecord};
use crate::repo::{from_record, to_record, RepoError, RepoResult};
use crate::store::{Key, Store, StoreError};

/// Repository interface for notes.
pub trait NoteRepository {
    fn list_by_owner(&self, email: &str) -> RepoResult<Vec<NoteRecord>>;
    fn create(&self, note: &str, owner_email: &str) -> RepoResult<i32>;
    fn delete_by_id(&self, id: i32) -> RepoResult<()>;
}

/// Store-backed note repository.
#[derive(Clone)]
pub struct StoreNoteRepository {
    store: Arc<Store>,
}

impl StoreNoteRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

impl NoteRepository for StoreNoteRepository {
    /// All notes owned by `email`, projected to id and body.
    fn list_by_owner(&self, email: &str) -> RepoResult<Vec<NoteRecord>> {
        let txn = self.store.read();
        let rows = txn.get_all(TABLE_NOTES, "created_by", &Key::from(email))?;
        rows.into_iter()
            .map(|row| from_record::<Note>(row).map(NoteRecord::from))
            .collect()
    }

    /// Inserts a note with a fresh id and returns that id.
    fn create(&self, note: &str, owner_email: &str) -> RepoResult<i32> {
        let note = Note {
            id: fresh_id(),
            note: note.to_string(),
            created_by: owner_email.to_string(),
        };
        let record = to_record(&note)?;

        let mut txn = self.store.write();
        if let Err(err) = txn.insert(TABLE_NOTES, record) {
            txn.abort();
            warn!("event=note_create module=note_repo status=error error={err}");
            return Err(err.into());
        }
        txn.commit();
        debug!("event=note_create module=note_repo status=ok note_id={}", note.id);
        Ok(note.id)
    }

    /// Deletes by id; deleting an id that is already gone is `NotFound`.
    fn delete_by_id(&self, id: i32) -> RepoResult<()> {
        let mut txn = self.store.write();
        match txn.delete(TABLE_NOTES, &Key::from(id)) {
            Ok(()) => {
                txn.commit();
                debug!("event=note_delete module=note_repo status=ok note_id={id}");
                Ok(())
            }
            Err(StoreError::NotFound { .. }) => {
                txn.abort();
                warn!("event=note_delete module=note_repo status=error note_id={id} reason=not_found");
                Err(RepoError::NotFound)
            }
            Err(err) => {
                txn.abort();
                warn!("event=note_delete module=note_repo status=error note_id={id} error={err}");
                Err(err.into())
            }
        }
    }
}
