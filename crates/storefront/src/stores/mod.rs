//! State stores mirroring the remote commerce API.
//!
//! # Architecture
//!
//! Three explicit, dependency-injected stores replace what a browser
//! client would keep in global mutable context:
//!
//! - [`SessionStore`] - the authentication token and derived identity
//! - [`CartStore`] - the cart snapshot, a verbatim mirror of the most
//!   recent server response
//! - [`WishlistStore`] - the client-local liked-product set
//!
//! Each store publishes changes over a `tokio::sync::watch` channel and
//! persists what it must through an injected [`LocalStorage`]. Stores
//! never render UI and never retry; failures propagate to the initiating
//! view, which owns user-visible notification.
//!
//! [`UserStores`] bundles one of each per isolated storage - one bundle
//! per browser session in the server, one per test elsewhere.

pub mod cart;
pub mod claims;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use cart::{CartSnapshot, CartStore, CheckoutOutcome, PaymentMethod};
pub use claims::{ClaimsError, TokenClaims, decode_claims};
pub use session::{Identity, SessionStore};
pub use storage::{LocalStorage, MemoryStorage, storage_keys};
pub use wishlist::WishlistStore;

use std::sync::Arc;

use crate::commerce::CommerceClient;

/// One user's store bundle: session, cart, and wishlist over a shared
/// storage.
pub struct UserStores {
    session: SessionStore,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl UserStores {
    /// Create a store bundle over a fresh in-memory storage.
    #[must_use]
    pub fn new(client: CommerceClient) -> Self {
        Self::with_storage(client, Arc::new(MemoryStorage::new()))
    }

    /// Create a store bundle over the given storage, rehydrating the
    /// session and wishlist from it.
    #[must_use]
    pub fn with_storage(client: CommerceClient, storage: Arc<dyn LocalStorage>) -> Self {
        let session = SessionStore::new(client.clone(), storage.clone());
        let cart = CartStore::new(client, session.clone());
        let wishlist = WishlistStore::new(storage);

        Self {
            session,
            cart,
            wishlist,
        }
    }

    /// The session store.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// The wishlist store.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    /// Sign out and reset dependent state: the session clears the cart.
    pub fn sign_out(&self) {
        self.session.sign_out();
        self.cart.reset();
    }
}
