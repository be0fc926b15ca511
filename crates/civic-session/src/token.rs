//! Access token slot
//!
//! Holds at most one bearer token. The slot lives only as long as the
//! process; every refresh overwrites it and a failed refresh empties it.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Fixed key the token slot is known by.
pub const ACCESS_TOKEN_KEY: &str = "civic_access_token";

/// Opaque bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Default)]
pub struct TokenStore {
    slot: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> &'static str {
        ACCESS_TOKEN_KEY
    }

    /// Current token, if one is held
    pub fn get(&self) -> Option<AccessToken> {
        self.slot.read().clone()
    }

    /// Store a token, replacing any prior value
    pub fn set(&self, token: AccessToken) {
        *self.slot.write() = Some(token);
        tracing::debug!(key = ACCESS_TOKEN_KEY, "Stored access token");
    }

    pub fn clear(&self) {
        if self.slot.write().take().is_some() {
            tracing::debug!(key = ACCESS_TOKEN_KEY, "Cleared access token");
        }
    }

    pub fn is_present(&self) -> bool {
        self.slot.read().is_some()
    }
}

impl Clone for TokenStore {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}
