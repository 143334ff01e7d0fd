//! Core domain logic for NoteKeep.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod token;

pub use db::open_store;
pub use logging::init_logging;
pub use model::{fresh_id, Claims, Identity, Note, NoteRecord, User};
pub use repo::note_repo::{NoteRepository, StoreNoteRepository};
pub use repo::user_repo::{StoreUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::login_service::{LoginError, LoginService};
pub use service::notes_service::{NotesError, NotesService};
pub use store::{Key, ReadTxn, Schema, Store, StoreError, StoreResult, WriteTxn};
pub use token::{TokenCodec, TokenError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
