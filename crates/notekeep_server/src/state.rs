//! Dependency-injection root.
//!
//! # Responsibility
//! - Construct the store, repositories, services, and token codec once at
//!   startup and share them by reference.
//!
//! # Invariants
//! - No global singletons: each `AppState` owns an isolated store, so tests
//!   build as many independent instances as they need.

use std::sync::Arc;

use log::{info, warn};
use notekeep_core::{
    open_store, LoginService, NotesService, StoreError, StoreNoteRepository, StoreUserRepository,
    TokenCodec, UserRepository,
};

use crate::config::Settings;

/// Everything the handlers and middleware need, built once in `main`.
pub struct AppState {
    pub users: StoreUserRepository,
    pub login: LoginService<StoreUserRepository>,
    pub notes: NotesService<StoreNoteRepository>,
    pub codec: TokenCodec,
}

/// Builds the application state and seeds the initial account.
pub fn build_state(settings: &Settings) -> Result<Arc<AppState>, StoreError> {
    let store = Arc::new(open_store()?);
    let users = StoreUserRepository::new(Arc::clone(&store));
    let notes = NotesService::new(StoreNoteRepository::new(Arc::clone(&store)));
    let codec = TokenCodec::with_ttl(&settings.auth.secret, settings.auth.token_ttl_secs);
    let login = LoginService::new(users.clone(), codec.clone());

    match users.create(
        &settings.seed.name,
        &settings.seed.email,
        &settings.seed.password,
    ) {
        Ok(()) => info!("event=seed_user module=state status=ok"),
        // A fresh store cannot collide; anything else is worth a look but
        // not worth refusing to start over.
        Err(err) => warn!("event=seed_user module=state status=error error={err}"),
    }

    Ok(Arc::new(AppState {
        users,
        login,
        notes,
        codec,
    }))
}
