//! Display-only identity state
//!
//! Tracks the currently signed-in identity, if any, for the auth panel.
//! The search pipeline never consults this state; nothing is gated on it.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// A signed-in user as shown in the header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Name shown next to the avatar
    pub display_name: String,
    /// Account email, when known
    pub email: Option<String>,
    /// Whether the email address has been verified
    pub email_verified: bool,
}

/// Holds the current identity or none
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Identity>>,
}

impl SessionStore {
    /// Create an empty store (nobody signed in)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently signed-in identity, if any
    pub fn current(&self) -> Option<Identity> {
        self.current.read().expect("session lock poisoned").clone()
    }

    /// Record a sign-in
    pub fn sign_in(&self, identity: Identity) {
        *self.current.write().expect("session lock poisoned") = Some(identity);
    }

    /// Clear the current identity
    pub fn sign_out(&self) {
        *self.current.write().expect("session lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let store = SessionStore::new();
        assert!(store.current().is_none());

        store.sign_in(Identity {
            display_name: "Linh".to_string(),
            email: Some("linh@example.com".to_string()),
            email_verified: true,
        });
        assert_eq!(store.current().unwrap().display_name, "Linh");

        store.sign_out();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_sign_out_when_signed_out_is_noop() {
        let store = SessionStore::new();
        store.sign_out();
        assert!(store.current().is_none());
    }
}
