//! Wishlist store - a client-local set of liked product ids.
//!
//! No server entity backs the wishlist: it lives entirely in local
//! storage under a fixed key, serialized as an ordered list, and is lost
//! when that storage is cleared. This is a known inconsistency mirrored
//! from the storefront's behavior, not something to fix here.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use fresh_cart_core::ProductId;

use super::storage::{LocalStorage, storage_keys};

/// Holder of the liked-product id set, in insertion order.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistStoreInner>,
}

struct WishlistStoreInner {
    storage: Arc<dyn LocalStorage>,
    state: RwLock<Vec<ProductId>>,
    tx: watch::Sender<Vec<ProductId>>,
}

impl WishlistStore {
    /// Create a wishlist store, loading the persisted id list.
    ///
    /// An unreadable persisted list is treated as empty.
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        let ids: Vec<ProductId> = storage
            .get(storage_keys::LIKED_PRODUCTS)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(ids) => Some(ids),
                Err(e) => {
                    tracing::warn!("Discarding unreadable persisted wishlist: {e}");
                    None
                }
            })
            .unwrap_or_default();

        let (tx, _rx) = watch::channel(ids.clone());

        Self {
            inner: Arc::new(WishlistStoreInner {
                storage,
                state: RwLock::new(ids),
                tx,
            }),
        }
    }

    /// Toggle a product's membership. Returns `true` when the product is
    /// liked after the call. Toggling twice restores the original set.
    pub fn toggle(&self, product_id: &ProductId) -> bool {
        let (ids, now_liked) = {
            let mut ids = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let now_liked = if let Some(pos) = ids.iter().position(|id| id == product_id) {
                ids.remove(pos);
                false
            } else {
                ids.push(product_id.clone());
                true
            };
            (ids.clone(), now_liked)
        };

        self.persist(&ids);
        self.inner.tx.send_replace(ids);
        now_liked
    }

    /// Remove a product from the wishlist. Returns `true` if it was present.
    pub fn remove(&self, product_id: &ProductId) -> bool {
        let removed = {
            let mut ids = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match ids.iter().position(|id| id == product_id) {
                Some(pos) => {
                    ids.remove(pos);
                    true
                }
                None => false,
            }
        };

        if removed {
            let ids = self.ids();
            self.persist(&ids);
            self.inner.tx.send_replace(ids);
        }
        removed
    }

    /// Whether a product is liked.
    #[must_use]
    pub fn is_liked(&self, product_id: &ProductId) -> bool {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(product_id)
    }

    /// The liked ids, in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of liked products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to wishlist changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<ProductId>> {
        self.inner.tx.subscribe()
    }

    fn persist(&self, ids: &[ProductId]) {
        match serde_json::to_string(ids) {
            Ok(json) => self.inner.storage.set(storage_keys::LIKED_PRODUCTS, &json),
            Err(e) => tracing::error!("Failed to serialize wishlist: {e}"),
        }
    }
}
