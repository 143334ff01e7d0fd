//! Repository layer over the table store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for users and notes.
//! - Keep transaction handling inside the persistence boundary: every
//!   operation opens a transaction, aborts it before propagating any error,
//!   and commits on success.
//!
//! # Invariants
//! - No transaction is ever left open on any path.
//! - Repositories are the only supported entry points into the store.

pub mod note_repo;
pub mod user_repo;

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{Record, StoreError};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user/note persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// No matching record.
    NotFound,
    /// Stored password does not match the supplied one.
    InvalidCredentials,
    /// No user with that email, or the stored name does not match.
    InvalidUser,
    /// Stored record failed to round-trip through its model type.
    InvalidData(String),
    /// Store-level failure, unique-index violations included.
    Store(StoreError),
}

impl RepoError {
    /// True when the error is a unique-index collision.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Store(StoreError::ConstraintViolation { .. }))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "no matching record"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::InvalidUser => write!(f, "invalid user"),
            Self::InvalidData(message) => write!(f, "invalid persisted record: {message}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub(crate) fn to_record<T: Serialize>(value: &T) -> RepoResult<Record> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(RepoError::InvalidData("record is not a JSON object".into())),
        Err(err) => Err(RepoError::InvalidData(err.to_string())),
    }
}

pub(crate) fn from_record<T: DeserializeOwned>(record: Record) -> RepoResult<T> {
    serde_json::from_value(serde_json::Value::Object(record))
        .map_err(|err| RepoError::InvalidData(err.to_string()))
}
