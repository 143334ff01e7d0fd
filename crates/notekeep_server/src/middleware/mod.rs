//! Request-scoped middleware: correlation ids and the session gate.

pub mod request_id;
pub mod session_gate;
