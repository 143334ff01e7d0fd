//! Route handlers: thin translation between HTTP and the services.
//!
//! # Invariants
//! - Protected handlers take the owner email from `AuthEmail` only; bodies
//!   never carry identity past the gate.
//! - Service errors map to envelope failures; raw error chains stay in the
//!   log.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};
use log::warn;
use notekeep_core::{LoginError, NotesError};
use serde::{Deserialize, Serialize};

use crate::envelope::{failure, success};
use crate::middleware::request_id::RequestId;
use crate::middleware::session_gate::AuthEmail;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub sid: String,
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct AddNoteResponse {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct DeleteNoteRequest {
    pub id: i32,
}

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "invalid request body");
    };
    if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "invalid request body");
    }
    match state
        .login
        .sign_up(&request.name, &request.email, &request.password)
    {
        Ok(()) => success(StatusCode::CREATED, "user created"),
        Err(LoginError::AlreadyExists) => failure(StatusCode::CONFLICT, "user already exists"),
        Err(err) => {
            warn!("event=signup module=handlers status=error request_id={request_id} error={err}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "sign-up failed")
        }
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "invalid request body");
    };
    if request.email.is_empty() || request.password.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "invalid request body");
    }
    match state.login.login(&request.email, &request.password) {
        Ok(sid) => success(StatusCode::OK, LoginResponse { sid }),
        Err(err) => {
            warn!("event=login module=handlers status=error request_id={request_id} error={err}");
            failure(StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Extension(AuthEmail(email)): Extension<AuthEmail>,
) -> Response {
    match state.notes.list(&email) {
        Ok(notes) => success(StatusCode::OK, notes),
        Err(err) => {
            warn!(
                "event=notes_list module=handlers status=error request_id={request_id} error={err}"
            );
            failure(StatusCode::INTERNAL_SERVER_ERROR, "failed to list notes")
        }
    }
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Extension(AuthEmail(email)): Extension<AuthEmail>,
    payload: Result<Json<AddNoteRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "invalid request body");
    };
    if request.note.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "invalid request body");
    }
    match state.notes.add(&request.note, &email) {
        Ok(id) => success(StatusCode::CREATED, AddNoteResponse { id }),
        Err(err) => {
            warn!(
                "event=notes_add module=handlers status=error request_id={request_id} error={err}"
            );
            failure(StatusCode::INTERNAL_SERVER_ERROR, "failed to add note")
        }
    }
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Extension(AuthEmail(_email)): Extension<AuthEmail>,
    payload: Result<Json<DeleteNoteRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "invalid request body");
    };
    match state.notes.delete(request.id) {
        Ok(()) => success(StatusCode::OK, "successfully deleted"),
        Err(NotesError::NotFound) => failure(StatusCode::NOT_FOUND, "note not found"),
        Err(err) => {
            warn!(
                "event=notes_delete module=handlers status=error request_id={request_id} error={err}"
            );
            failure(StatusCode::INTERNAL_SERVER_ERROR, "failed to delete note")
        }
    }
}
