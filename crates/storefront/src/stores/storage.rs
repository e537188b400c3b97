//! Persistent key-value storage behind the stores.
//!
//! The stores persist two things outside the server's control flow: the
//! session token and the wishlist id set, each under a fixed key. The
//! trait keeps the stores testable and lets each browser session get its
//! own isolated storage.

use std::collections::HashMap;
use std::sync::Mutex;

/// Fixed keys the stores persist under.
pub mod storage_keys {
    /// Key for the signed-in user's session token.
    pub const USER_TOKEN: &str = "userToken";

    /// Key for the wishlist's liked-product id list.
    pub const LIKED_PRODUCTS: &str = "likedProducts";
}

/// String key-value storage with last-write-wins semantics.
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Remove the value stored under `key`.
    fn remove(&self, key: &str);
}

/// In-memory [`LocalStorage`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(storage_keys::USER_TOKEN), None);

        storage.set(storage_keys::USER_TOKEN, "abc");
        assert_eq!(storage.get(storage_keys::USER_TOKEN), Some("abc".to_string()));

        storage.set(storage_keys::USER_TOKEN, "def");
        assert_eq!(storage.get(storage_keys::USER_TOKEN), Some("def".to_string()));

        storage.remove(storage_keys::USER_TOKEN);
        assert_eq!(storage.get(storage_keys::USER_TOKEN), None);
    }
}
