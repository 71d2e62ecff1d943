//! Shared bearer-credential slot.

use std::sync::Arc;

use parking_lot::RwLock;

/// Process-wide slot for the opaque auth token.
///
/// Set at login, cleared at logout, read (never mutated) by every outgoing
/// request. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously persisted token, if any.
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_present(&self) -> bool {
        self.token.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let store = CredentialStore::new();
        let other = store.clone();

        store.set("tok-123");
        assert_eq!(other.get().as_deref(), Some("tok-123"));

        other.clear();
        assert!(!store.is_present());
    }
}
