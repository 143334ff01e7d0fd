//! Domain records shared by repositories and services.
//!
//! # Responsibility
//! - Define the canonical user/note record shapes stored in the table store.
//! - Provide id generation for new records.
//!
//! # Invariants
//! - Records are immutable once stored; mutation is insert/delete only.
//! - `email` identifies a user everywhere outside the store's `id` index.

mod note;
mod user;

pub use note::{Note, NoteRecord};
pub use user::{Claims, Identity, User};

use uuid::Uuid;

/// Generates a record id from the leading 32 bits of a UUIDv4.
///
/// Collisions are improbable but not impossible; inserts guard against them
/// through the store's unique `id` index.
pub fn fresh_id() -> i32 {
    let uuid = Uuid::new_v4();
    let bytes = uuid.as_bytes();
    i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::fresh_id;

    #[test]
    fn fresh_ids_differ() {
        let a = fresh_id();
        let b = fresh_id();
        // Equal ids are possible in principle, vanishingly unlikely here.
        assert_ne!(a, b);
    }
}
