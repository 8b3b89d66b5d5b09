//! In-process admin session service.
//!
//! Login verifies the configured credentials with constant-time digest
//! comparison and issues an opaque bearer token. Only a SHA-256 digest of
//! the token is retained server-side; expired entries are dropped lazily on
//! the next resolution attempt.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::session::SessionState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Token handed to the browser after a successful login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    username: String,
    expires_at: OffsetDateTime,
}

pub struct SessionService {
    username: String,
    password_digest: Vec<u8>,
    ttl: Duration,
    sessions: DashMap<String, SessionEntry>,
}

impl SessionService {
    pub fn new(username: impl Into<String>, password: &str, ttl: Duration) -> Self {
        Self {
            username: username.into(),
            password_digest: digest(password.as_bytes()),
            ttl,
            sessions: DashMap::new(),
        }
    }

    /// Verify credentials and issue a session token. Username and password
    /// digests are both compared in constant time before either result is
    /// inspected.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let username_ok = digest(self.username.as_bytes())
            .ct_eq(&digest(username.as_bytes()));
        let password_ok = self.password_digest.ct_eq(&digest(password.as_bytes()));

        if !bool::from(username_ok & password_ok) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + self.ttl;
        self.sessions.insert(
            token_key(&token),
            SessionEntry {
                username: self.username.clone(),
                expires_at,
            },
        );

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolve the presented token (if any) to a terminal session state.
    pub fn resolve(&self, token: Option<&str>) -> SessionState {
        let Some(token) = token else {
            return SessionState::Unauthenticated;
        };

        let key = token_key(token);
        let Some(entry) = self.sessions.get(&key) else {
            return SessionState::Unauthenticated;
        };

        if entry.expires_at <= OffsetDateTime::now_utc() {
            drop(entry);
            self.sessions.remove(&key);
            return SessionState::Unauthenticated;
        }

        SessionState::authenticated(entry.username.clone())
    }

    /// Remove the server-side session record. Called on explicit logout,
    /// before the cookie is cleared.
    pub fn sign_out(&self, token: &str) {
        self.sessions.remove(&token_key(token));
    }

    #[cfg(test)]
    fn expire(&self, token: &str) {
        if let Some(mut entry) = self.sessions.get_mut(&token_key(token)) {
            entry.expires_at = OffsetDateTime::now_utc() - Duration::from_secs(1);
        }
    }
}

fn digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

fn token_key(token: &str) -> String {
    hex::encode(digest(token.as_bytes()))
}

fn generate_token() -> String {
    let mut material = Vec::with_capacity(32);
    material.extend_from_slice(Uuid::new_v4().as_bytes());
    material.extend_from_slice(Uuid::new_v4().as_bytes());
    URL_SAFE_NO_PAD.encode(material)
}
