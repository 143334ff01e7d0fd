//! Session gate: the authentication filter in front of every protected
//! route.
//!
//! # Responsibility
//! - Parse the request body as a generic JSON object, extract and verify
//!   the `sid` session token, and re-validate its claims against the user
//!   repository.
//! - Strip `sid` and forward the remaining body, field order preserved,
//!   with the authenticated email attached to the request.
//!
//! # Invariants
//! - Every failure short-circuits with one `unauthorized` envelope; which
//!   step failed is visible only in the log.
//! - The body stays a generic document; its shape is route-specific and
//!   unknown here.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use log::warn;
use notekeep_core::UserRepository;
use serde_json::Value;

use crate::envelope::failure;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

/// Authenticated identity for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthEmail(pub String);

const SESSION_FIELD: &str = "sid";
const BODY_LIMIT: usize = 1024 * 1024;

pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "-".to_string());
    let (mut parts, body) = req.into_parts();

    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => return reject(&request_id, "unreadable body"),
    };
    let mut fields: serde_json::Map<String, Value> = match serde_json::from_slice(&bytes) {
        Ok(fields) => fields,
        Err(_) => return reject(&request_id, "body is not a JSON object"),
    };

    let token = match fields.get(SESSION_FIELD) {
        Some(Value::String(token)) => token.clone(),
        Some(_) => return reject(&request_id, "sid is not a string"),
        None => return reject(&request_id, "sid missing"),
    };

    let claims = match state.codec.verify(&token) {
        Ok(claims) => claims,
        Err(err) => return reject(&request_id, &err.to_string()),
    };
    if let Err(err) = state.users.verify_identity(&claims.email, &claims.name) {
        return reject(&request_id, &err.to_string());
    }

    fields.remove(SESSION_FIELD);
    let forwarded = Value::Object(fields).to_string();
    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(forwarded.len()));
    parts.extensions.insert(AuthEmail(claims.email));

    next.run(Request::from_parts(parts, Body::from(forwarded))).await
}

fn reject(request_id: &str, reason: &str) -> Response {
    warn!("event=session_gate module=middleware status=error request_id={request_id} reason={reason}");
    failure(StatusCode::UNAUTHORIZED, "unauthorized")
}
