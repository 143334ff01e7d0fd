//! HTTP edge for NoteKeep.
//!
//! # Responsibility
//! - Route sign-up/login and the protected note operations.
//! - Apply the request-id and session-gate middleware in order.
//!
//! # Invariants
//! - Every protected route sits behind the session gate; no handler trusts
//!   a body field for identity.

pub mod config;
pub mod envelope;
pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::post;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::request_id::request_id;
use crate::middleware::session_gate::session_gate;
use crate::state::AppState;

/// Builds the full application router.
///
/// All note routes take POST/DELETE with the session token in the body, so
/// the gate can read and strip it.
pub fn app(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/notes", post(handlers::list_notes))
        .route(
            "/note",
            post(handlers::add_note).delete(handlers::delete_note),
        )
        .route_layer(from_fn_with_state(Arc::clone(&state), session_gate));

    let api = Router::new()
        .route("/signup", post(handlers::sign_up))
        .route("/login", post(handlers::login))
        .merge(protected);

    Router::new()
        .nest("/v1/api", api)
        .layer(from_fn(request_id))
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
