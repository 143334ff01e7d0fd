//! Session token codec: HMAC-signed, time-limited identity claims.
//!
//! # Responsibility
//! - Turn a verified identity into an opaque signed token string.
//! - Verify and decode presented tokens, expiry included.
//!
//! # Invariants
//! - No server-side session state; the token is the only session record.
//! - Signature comparison is constant-time via the MAC verifier.
//!
//! Token shape: `base64url(claims-json) . base64url(hmac-sha256)`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::model::Claims;

type HmacSha256 = Hmac<Sha256>;

/// Tokens expire five minutes after issuance.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 300;

/// Token issue/verify error.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Not two base64url parts, or the payload is not valid claims JSON.
    Malformed,
    /// MAC did not verify against the configured secret.
    InvalidSignature,
    /// Claims expiry is in the past.
    Expired,
    /// MAC construction or claims serialization failed at issue time.
    Signing,
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::InvalidSignature => write!(f, "invalid token signature"),
            Self::Expired => write!(f, "token expired"),
            Self::Signing => write!(f, "token signing failed"),
        }
    }
}

impl Error for TokenError {}

/// Issues and verifies session tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    key: Vec<u8>,
    ttl_secs: i64,
}

impl TokenCodec {
    /// Creates a codec with the default five-minute expiry.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, DEFAULT_TOKEN_TTL_SECS)
    }

    /// Creates a codec with an explicit expiry window in seconds.
    ///
    /// Zero or negative windows issue already-expired tokens; useful for
    /// exercising expiry handling.
    pub fn with_ttl(secret: &str, ttl_secs: i64) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
            ttl_secs,
        }
    }

    /// Builds, signs, and encodes claims for the given identity.
    pub fn issue(&self, email: &str, name: &str) -> Result<String, TokenError> {
        let claims = Claims {
            email: email.to_string(),
            name: name.to_string(),
            exp: unix_now() + self.ttl_secs,
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Signing)?;
        let mac = self.sign(&payload)?;
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(mac)
        ))
    }

    /// Verifies the MAC and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let (payload_b64, mac_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let presented_mac = URL_SAFE_NO_PAD
            .decode(mac_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::Signing)?;
        mac.update(&payload);
        mac.verify_slice(&presented_mac)
            .map_err(|_| TokenError::InvalidSignature)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= unix_now() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::Signing)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
