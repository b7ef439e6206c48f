//! Where the bearer token lives between calls.
//!
//! The client never reaches for ambient storage: whoever builds an [`crate::ApiClient`] hands it a
//! [`TokenStore`], which is read every time an authenticated call goes out.

use std::sync::RwLock;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("The session store is poisoned")]
    Poisoned,
}

/// Storage for the session token.
///
/// Written by login, cleared by logout and account removal, read at call time.
pub trait TokenStore: Send + Sync {
    /// The current token, if any.
    fn token(&self) -> Option<String>;

    /// Replace the current token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token could not be persisted.
    fn set_token(&self, token: &str) -> Result<(), SessionError>;

    /// Forget the current token.
    ///
    /// # Errors
    ///
    /// Returns an error if a persisted token could not be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// A [`TokenStore`] that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        *self.token.write().map_err(|_| SessionError::Poisoned)? = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}
