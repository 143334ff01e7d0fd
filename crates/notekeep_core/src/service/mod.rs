//! Use-case services orchestrating repositories and the token codec.
//!
//! # Responsibility
//! - Translate repository outcomes into domain decisions.
//! - Keep HTTP-facing callers free of storage and token details.

pub mod login_service;
pub mod notes_service;
