//! Session-scoped token slot.
//!
//! Holds the app/channel authorization token read by every authenticated
//! webhook call. The slot tracks initialization explicitly, so reading before
//! the first `set` fails deterministically instead of yielding an empty value.

use crate::error::{DevKitError, Result};
use std::sync::RwLock;

/// Token holder shared by the facade and the channel message client.
#[derive(Debug, Default)]
pub struct TokenStore {
    inner: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an initial token already set.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(Some(token.into())),
        }
    }

    /// Store the token. Any string is accepted, including empty; last write wins.
    pub fn set(&self, token: impl Into<String>) {
        let mut g = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *g = Some(token.into());
    }

    /// Return the stored token, or `NotInitialized` if `set` was never called.
    pub fn get(&self) -> Result<String> {
        let g = self.inner.read().unwrap_or_else(|e| e.into_inner());
        g.clone().ok_or(DevKitError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_before_set_is_not_initialized() {
        let store = TokenStore::new();
        assert!(!store.is_initialized());
        assert!(matches!(store.get(), Err(DevKitError::NotInitialized)));
    }

    #[test]
    fn get_returns_last_set_token() {
        let store = TokenStore::new();
        store.set("first");
        assert_eq!(store.get().unwrap(), "first");
        store.set("second");
        assert_eq!(store.get().unwrap(), "second");
    }

    #[test]
    fn empty_token_counts_as_initialized() {
        let store = TokenStore::new();
        store.set("");
        assert!(store.is_initialized());
        assert_eq!(store.get().unwrap(), "");
    }

    #[test]
    fn with_token_is_initialized() {
        let store = TokenStore::with_token("abc");
        assert_eq!(store.get().unwrap(), "abc");
    }
}
