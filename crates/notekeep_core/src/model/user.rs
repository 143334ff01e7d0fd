//! User account record and identity projections.

use serde::{Deserialize, Serialize};

/// Stored user account.
///
/// The password field holds the sign-up value verbatim; credential checks
/// are a direct string comparison. Storing a salted hash instead would not
/// change any caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    /// Unique across all users, enforced by the store's `email` index.
    pub email: String,
    pub password: String,
}

/// Verified identity returned by credential checks.
///
/// Deliberately excludes the password so it can cross layer boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
}

/// Session token payload.
///
/// Lives only inside a signed token; never stored server-side. Validity is
/// re-derived on every request from the signature, `exp`, and a fresh user
/// lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub name: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}
