//! Login and sign-up use-cases.
//!
//! # Responsibility
//! - Validate credentials and issue a session token on login.
//! - Create accounts on sign-up with duplicate detection.
//!
//! # Invariants
//! - Duplicate sign-up reports "already exists" both when caught by the
//!   existence pre-check and when a racing insert trips the unique index.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::{info, warn};

use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::token::{TokenCodec, TokenError};

/// Service error for login/sign-up.
#[derive(Debug)]
pub enum LoginError {
    /// Sign-up email is already registered.
    AlreadyExists,
    /// Credential verification or account persistence failed.
    Repo(RepoError),
    /// Session token issuance failed.
    Token(TokenError),
}

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "user already exists"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Token(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoginError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyExists => None,
            Self::Repo(err) => Some(err),
            Self::Token(err) => Some(err),
        }
    }
}

/// Login/sign-up service over a user repository.
#[derive(Clone)]
pub struct LoginService<R: UserRepository> {
    repo: R,
    codec: TokenCodec,
}

impl<R: UserRepository> LoginService<R> {
    pub fn new(repo: R, codec: TokenCodec) -> Self {
        Self { repo, codec }
    }

    /// Validates credentials and returns a signed session token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, LoginError> {
        let identity = self.repo.verify_credentials(email, password).map_err(|err| {
            warn!("event=login module=login_service status=error error={err}");
            LoginError::Repo(err)
        })?;
        let token = self
            .codec
            .issue(&identity.email, &identity.name)
            .map_err(|err| {
                warn!("event=login module=login_service status=error error={err}");
                LoginError::Token(err)
            })?;
        info!("event=login module=login_service status=ok");
        Ok(token)
    }

    /// Creates an account, rejecting duplicate emails.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<(), LoginError> {
        if self.repo.exists(email).map_err(LoginError::Repo)? {
            warn!("event=signup module=login_service status=error reason=already_exists");
            return Err(LoginError::AlreadyExists);
        }
        match self.repo.create(name, email, password) {
            Ok(()) => {
                info!("event=signup module=login_service status=ok");
                Ok(())
            }
            // A concurrent sign-up can slip past the pre-check; the unique
            // index is the authoritative duplicate detector.
            Err(err) if err.is_constraint_violation() => {
                warn!("event=signup module=login_service status=error reason=already_exists");
                Err(LoginError::AlreadyExists)
            }
            Err(err) => {
                warn!("event=signup module=login_service status=error error={err}");
                Err(LoginError::Repo(err))
            }
        }
    }
}
