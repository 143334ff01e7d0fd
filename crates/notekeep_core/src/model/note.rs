//! Note record and its list projection.

use serde::{Deserialize, Serialize};

/// Stored note.
///
/// Ownership is by email value, not a foreign-key reference; the repository
/// layer only ever writes `created_by` values taken from an authenticated
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i32,
    pub note: String,
    pub created_by: String,
}

/// Note projection handed to callers: id and body, owner omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: i32,
    pub note: String,
}

impl From<Note> for NoteRecord {
    fn from(value: Note) -> Self {
        Self {
            id: value.id,
            note: value.note,
        }
    }
}
