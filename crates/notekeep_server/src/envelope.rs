//! JSON response envelope shared by every route.
//!
//! Shape: `{ "status": "<code>", "data"?: ..., "error"?: { "description" } }`.
//! Failures carry a description string only; internal error text never
//! reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

pub fn success<T: Serialize>(code: StatusCode, data: T) -> Response {
    let envelope = Envelope {
        status: code.as_u16().to_string(),
        data: Some(data),
        error: None,
    };
    (code, Json(envelope)).into_response()
}

pub fn failure(code: StatusCode, description: impl Into<String>) -> Response {
    let envelope = Envelope::<()> {
        status: code.as_u16().to_string(),
        data: None,
        error: Some(ErrorBody {
            description: description.into(),
        }),
    };
    (code, Json(envelope)).into_response()
}
