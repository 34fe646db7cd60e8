//! Client-side session storage and the bearer token read from it.
//!
//! API clients never look the token up themselves; callers read it once from
//! the [`SessionStore`] and pass an [`AuthToken`] into every request.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ClientError, ClientResult};

pub const TOKEN_KEY: &str = "token";

#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.set(TOKEN_KEY, token);
        store
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.get(TOKEN_KEY)
            .filter(|v| !v.trim().is_empty())
            .map(AuthToken::new)
    }

    pub fn require_token(&self) -> ClientResult<AuthToken> {
        self.token().ok_or(ClientError::MissingToken)
    }
}
