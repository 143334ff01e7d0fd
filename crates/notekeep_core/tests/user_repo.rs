use std::sync::Arc;

use notekeep_core::db::default_schema;
use notekeep_core::store::Store;
use notekeep_core::{RepoError, StoreUserRepository, UserRepository};

fn repo() -> StoreUserRepository {
    let store = Arc::new(Store::new(default_schema()).unwrap());
    StoreUserRepository::new(store)
}

#[test]
fn create_then_find_by_email_roundtrip() {
    let repo = repo();
    repo.create("Ada", "ada@example.com", "secret").unwrap();

    let user = repo.find_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
}

#[test]
fn find_absent_user_is_none() {
    let repo = repo();
    assert!(repo.find_by_email("nobody@example.com").unwrap().is_none());
}

#[test]
fn exists_is_false_for_absent_and_true_after_create() {
    let repo = repo();
    assert!(!repo.exists("ada@example.com").unwrap());
    repo.create("Ada", "ada@example.com", "secret").unwrap();
    assert!(repo.exists("ada@example.com").unwrap());
}

#[test]
fn duplicate_email_fails_with_constraint_violation() {
    let repo = repo();
    repo.create("Ada", "ada@example.com", "secret").unwrap();

    let err = repo.create("Imposter", "ada@example.com", "other").unwrap_err();
    assert!(err.is_constraint_violation());
    // The original account is untouched.
    let user = repo.find_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(user.name, "Ada");
}

#[test]
fn verify_credentials_returns_identity_without_password() {
    let repo = repo();
    repo.create("Ada", "ada@example.com", "secret").unwrap();

    let identity = repo.verify_credentials("ada@example.com", "secret").unwrap();
    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.name, "Ada");
}

#[test]
fn verify_credentials_unknown_email_is_not_found() {
    let repo = repo();
    let err = repo
        .verify_credentials("nobody@example.com", "secret")
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[test]
fn verify_credentials_wrong_password_is_invalid_credentials() {
    let repo = repo();
    repo.create("Ada", "ada@example.com", "secret").unwrap();

    let err = repo
        .verify_credentials("ada@example.com", "wrong")
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidCredentials));
}

#[test]
fn verify_identity_matches_stored_name_exactly() {
    let repo = repo();
    repo.create("Ada", "ada@example.com", "secret").unwrap();

    repo.verify_identity("ada@example.com", "Ada").unwrap();
    assert!(matches!(
        repo.verify_identity("ada@example.com", "ada").unwrap_err(),
        RepoError::InvalidUser
    ));
    assert!(matches!(
        repo.verify_identity("nobody@example.com", "Ada").unwrap_err(),
        RepoError::InvalidUser
    ));
}
