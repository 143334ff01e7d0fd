use std::sync::Arc;
use std::thread;

use notekeep_core::db::default_schema;
use notekeep_core::store::Store;
use notekeep_core::{
    LoginError, LoginService, NotesService, StoreNoteRepository, StoreUserRepository, TokenCodec,
    UserRepository,
};

fn login_service(store: &Arc<Store>) -> LoginService<StoreUserRepository> {
    LoginService::new(
        StoreUserRepository::new(Arc::clone(store)),
        TokenCodec::new("test-secret"),
    )
}

#[test]
fn sign_up_then_login_issues_verifiable_token() {
    let store = Arc::new(Store::new(default_schema()).unwrap());
    let login = login_service(&store);

    login.sign_up("Ada", "ada@example.com", "secret").unwrap();
    let token = login.login("ada@example.com", "secret").unwrap();

    let claims = TokenCodec::new("test-secret").verify(&token).unwrap();
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.name, "Ada");
}

#[test]
fn login_with_wrong_password_fails() {
    let store = Arc::new(Store::new(default_schema()).unwrap());
    let login = login_service(&store);

    login.sign_up("Ada", "ada@example.com", "secret").unwrap();
    assert!(matches!(
        login.login("ada@example.com", "wrong").unwrap_err(),
        LoginError::Repo(_)
    ));
}

#[test]
fn duplicate_sign_up_reports_already_exists_every_time() {
    let store = Arc::new(Store::new(default_schema()).unwrap());
    let login = login_service(&store);

    login.sign_up("Ada", "ada@example.com", "secret").unwrap();
    for _ in 0..2 {
        assert!(matches!(
            login.sign_up("Ada", "ada@example.com", "secret").unwrap_err(),
            LoginError::AlreadyExists
        ));
    }
}

#[test]
fn concurrent_duplicate_sign_ups_let_at_most_one_succeed() {
    for _ in 0..16 {
        let store = Arc::new(Store::new(default_schema()).unwrap());
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let login = login_service(&store);
                thread::spawn(move || login.sign_up("Ada", "ada@example.com", "secret"))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one concurrent sign-up may win");
        for result in results {
            if let Err(err) = result {
                assert!(matches!(err, LoginError::AlreadyExists));
            }
        }
    }
}

#[test]
fn notes_service_scopes_to_authenticated_email() {
    let store = Arc::new(Store::new(default_schema()).unwrap());
    let notes = NotesService::new(StoreNoteRepository::new(Arc::clone(&store)));

    let id = notes.add("remember the milk", "ada@example.com").unwrap();
    notes.add("other owner", "grace@example.com").unwrap();

    let listed = notes.list("ada@example.com").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].note, "remember the milk");

    notes.delete(id).unwrap();
    assert!(notes.list("ada@example.com").unwrap().is_empty());
}

#[test]
fn rename_invalidates_identity_check() {
    let store = Arc::new(Store::new(default_schema()).unwrap());
    let users = StoreUserRepository::new(Arc::clone(&store));
    users.create("Ada", "ada@example.com", "secret").unwrap();

    // Claims minted for a different name fail re-validation.
    assert!(users.verify_identity("ada@example.com", "Countess").is_err());
}
