//! Note use-cases for an authenticated owner.
//!
//! # Responsibility
//! - List, add, and delete notes on behalf of an authenticated email.
//!
//! # Invariants
//! - The owner email always comes from the authenticated request identity,
//!   never from the request body.
//! - Deletion is by id only; any authenticated user may delete any note.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::warn;

use crate::model::NoteRecord;
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoError;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NotesError {
    /// Target note does not exist.
    NotFound,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NotesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "note not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for NotesError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

/// Notes service over a note repository.
#[derive(Clone)]
pub struct NotesService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NotesService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All notes owned by `email`; empty when there are none.
    pub fn list(&self, email: &str) -> Result<Vec<NoteRecord>, NotesError> {
        self.repo.list_by_owner(email).map_err(|err| {
            warn!("event=notes_list module=notes_service status=error error={err}");
            err.into()
        })
    }

    /// Adds a note for `email`, returning the new id.
    pub fn add(&self, note: &str, email: &str) -> Result<i32, NotesError> {
        self.repo.create(note, email).map_err(|err| {
            warn!("event=notes_add module=notes_service status=error error={err}");
            err.into()
        })
    }

    /// Deletes a note by id.
    pub fn delete(&self, id: i32) -> Result<(), NotesError> {
        self.repo.delete_by_id(id).map_err(|err| {
            warn!("event=notes_delete module=notes_service status=error error={err}");
            err.into()
        })
    }
}
