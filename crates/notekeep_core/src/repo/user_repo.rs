//! User repository contract and store-backed implementation.
//!
//! # Responsibility
//! - Account lookups, existence checks, and account creation.
//! - Credential and identity verification against stored accounts.
//!
//! # Invariants
//! - `exists` treats an absent account as `Ok(false)`, never an error.
//! - Verification results never carry the stored password.

use std::sync::Arc;

use log::{debug, warn};

use crate::db::TABLE_USER;
use crate::model::{fresh_id, Identity, User};
use crate::repo::{from_record, to_record, RepoError, RepoResult};
use crate::store::{Key, Store};

/// Repository interface for user accounts.
pub trait UserRepository {
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn exists(&self, email: &str) -> RepoResult<bool>;
    fn create(&self, name: &str, email: &str, password: &str) -> RepoResult<()>;
    fn verify_credentials(&self, email: &str, password: &str) -> RepoResult<Identity>;
    fn verify_identity(&self, email: &str, name: &str) -> RepoResult<()>;
}

/// Store-backed user repository.
#[derive(Clone)]
pub struct StoreUserRepository {
    store: Arc<Store>,
}

impl StoreUserRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

impl UserRepository for StoreUserRepository {
    /// Point lookup by the unique `email` index.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let txn = self.store.read();
        let row = txn.get_first(TABLE_USER, "email", &Key::from(email))?;
        row.map(from_record).transpose()
    }

    fn exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email)?.is_some())
    }

    /// Creates an account with a fresh id.
    ///
    /// A duplicate email fails at insert through the unique index; callers
    /// decide how to surface that.
    fn create(&self, name: &str, email: &str, password: &str) -> RepoResult<()> {
        let user = User {
            id: fresh_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let record = to_record(&user)?;

        let mut txn = self.store.write();
        if let Err(err) = txn.insert(TABLE_USER, record) {
            txn.abort();
            warn!("event=user_create module=user_repo status=error error={err}");
            return Err(err.into());
        }
        txn.commit();
        debug!("event=user_create module=user_repo status=ok");
        Ok(())
    }

    /// Validates email/password against the stored account.
    fn verify_credentials(&self, email: &str, password: &str) -> RepoResult<Identity> {
        let user = match self.find_by_email(email)? {
            Some(user) => user,
            None => {
                warn!("event=verify_credentials module=user_repo status=error reason=unknown_account");
                return Err(RepoError::NotFound);
            }
        };
        if user.password != password {
            warn!("event=verify_credentials module=user_repo status=error reason=password_mismatch");
            return Err(RepoError::InvalidCredentials);
        }
        Ok(Identity {
            email: user.email,
            name: user.name,
        })
    }

    /// Re-confirms that token claims still match a live account.
    ///
    /// A name change invalidates outstanding tokens through this check; it
    /// is the only revocation mechanism there is.
    fn verify_identity(&self, email: &str, name: &str) -> RepoResult<()> {
        let user = self.find_by_email(email)?.ok_or(RepoError::InvalidUser)?;
        if user.name != name {
            warn!("event=verify_identity module=user_repo status=error reason=name_mismatch");
            return Err(RepoError::InvalidUser);
        }
        Ok(())
    }
}
