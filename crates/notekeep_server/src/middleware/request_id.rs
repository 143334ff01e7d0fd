//! Correlation id middleware.
//!
//! Attaches a fresh UUIDv4 to every request's extensions so log lines from
//! different layers can be tied back to one request.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Correlation id for one request.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

pub async fn request_id(mut req: Request, next: Next) -> Response {
    req.extensions_mut()
        .insert(RequestId(Uuid::new_v4().to_string()));
    next.run(req).await
}
