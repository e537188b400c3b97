//! Cart store - the authoritative mirror of the server-side cart.
//!
//! Every operation is a single request/response/replace cycle: the
//! server's returned cart document wholly replaces local state. There is
//! no merge logic and no optimistic update - after a failed request the
//! previous snapshot stands (a failed `fetch` resets to empty, matching
//! the storefront's behavior of treating an unreadable cart as empty).
//!
//! Concurrent mutations are not coordinated against each other; the last
//! response to arrive wins.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::instrument;

use fresh_cart_core::{CartId, Price, ProductId, UserId};

use crate::commerce::types::{CartLine, CartResponse, ShippingAddress};
use crate::commerce::{CommerceClient, CommerceError};

use super::session::SessionStore;

/// The local mirror of the most recent server cart document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartSnapshot {
    /// The server cart id, once known. `None` until the first fetch and
    /// after the cart is cleared or checked out.
    pub cart_id: Option<CartId>,
    /// The cart owner, as reported by the server.
    pub owner_id: Option<UserId>,
    /// The cart lines, verbatim from the server.
    pub items: Vec<CartLine>,
    /// The server's item count.
    pub item_count: u32,
    /// The server's total price.
    pub total_price: Price,
}

impl CartSnapshot {
    /// Whether a product appears in the cart.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|line| &line.product.id == product_id)
    }
}

impl From<CartResponse> for CartSnapshot {
    fn from(response: CartResponse) -> Self {
        let CartResponse {
            num_of_cart_items,
            cart_id,
            data,
            ..
        } = response;

        Self {
            cart_id: Some(cart_id.unwrap_or_else(|| data.id.clone())),
            owner_id: Some(data.cart_owner),
            items: data.products,
            item_count: num_of_cart_items,
            total_price: data.total_cart_price,
        }
    }
}

/// How an order is paid for at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PaymentMethod {
    /// Hosted payment session; the browser is redirected to an external URL.
    #[serde(rename = "online")]
    Online,
    /// Cash on delivery; the order completes synchronously.
    #[serde(rename = "cash")]
    CashOnDelivery,
}

/// The result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Redirect the browser to this externally hosted payment page.
    RedirectToPayment(String),
    /// The cash-on-delivery order was placed.
    OrderPlaced,
}

/// Holder of the cart snapshot, wired to the session store for its token.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    client: CommerceClient,
    session: SessionStore,
    state: RwLock<CartSnapshot>,
    tx: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Create an empty cart store reading its token from `session`.
    #[must_use]
    pub fn new(client: CommerceClient, session: SessionStore) -> Self {
        let (tx, _rx) = watch::channel(CartSnapshot::default());
        Self {
            inner: Arc::new(CartStoreInner {
                client,
                session,
                state: RwLock::new(CartSnapshot::default()),
                tx,
            }),
        }
    }

    /// Fail fast with an authentication error when no token is held.
    /// Runs before any network call.
    fn require_token(&self) -> Result<SecretString, CommerceError> {
        self.inner.session.token().ok_or(CommerceError::MissingAuth)
    }

    /// Replace local state with the server's document and notify.
    fn replace(&self, snapshot: CartSnapshot) -> CartSnapshot {
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        self.inner.tx.send_replace(snapshot.clone());
        snapshot
    }

    /// Fetch the cart from the server and mirror it.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is held or the request fails; on
    /// failure the local snapshot is reset to empty.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<CartSnapshot, CommerceError> {
        let result = match self.require_token() {
            Ok(token) => self.inner.client.get_cart(token.expose_secret()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => Ok(self.replace(response.into())),
            Err(e) => {
                self.replace(CartSnapshot::default());
                Err(e)
            }
        }
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is held or the request fails. The
    /// previous snapshot stands on failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: &ProductId) -> Result<CartSnapshot, CommerceError> {
        let token = self.require_token()?;
        let response = self
            .inner
            .client
            .add_to_cart(token.expose_secret(), product_id)
            .await?;
        Ok(self.replace(response.into()))
    }

    /// Set a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is held or the request fails. The
    /// previous snapshot stands on failure.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartSnapshot, CommerceError> {
        let token = self.require_token()?;
        let response = self
            .inner
            .client
            .update_cart_item(token.expose_secret(), product_id, quantity)
            .await?;
        Ok(self.replace(response.into()))
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is held or the request fails. The
    /// previous snapshot stands on failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<CartSnapshot, CommerceError> {
        let token = self.require_token()?;
        let response = self
            .inner
            .client
            .remove_from_cart(token.expose_secret(), product_id)
            .await?;
        Ok(self.replace(response.into()))
    }

    /// Delete the cart server-side and reset the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is held or the request fails. The
    /// previous snapshot stands on failure.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CommerceError> {
        let token = self.require_token()?;
        self.inner.client.clear_cart(token.expose_secret()).await?;
        self.replace(CartSnapshot::default());
        Ok(())
    }

    /// Check the cart out.
    ///
    /// The online branch creates a hosted payment session and returns its
    /// URL for the caller to redirect to; the cash branch completes
    /// synchronously. Either way a successful checkout resets the local
    /// snapshot. No idempotency key is used - a double-submit can place
    /// duplicate orders upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is held, no cart exists yet, or the
    /// request fails.
    #[instrument(skip(self, shipping))]
    pub async fn checkout(
        &self,
        shipping: &ShippingAddress,
        method: PaymentMethod,
    ) -> Result<CheckoutOutcome, CommerceError> {
        let token = self.require_token()?;

        let Some(cart_id) = self.snapshot().cart_id else {
            return Err(CommerceError::Rejected {
                status: None,
                message: "Please add products to cart first".to_string(),
            });
        };

        let outcome = match method {
            PaymentMethod::Online => {
                let session = self
                    .inner
                    .client
                    .create_checkout_session(token.expose_secret(), &cart_id, shipping)
                    .await?;
                CheckoutOutcome::RedirectToPayment(session.url)
            }
            PaymentMethod::CashOnDelivery => {
                self.inner
                    .client
                    .create_cash_order(token.expose_secret(), &cart_id, shipping)
                    .await?;
                CheckoutOutcome::OrderPlaced
            }
        };

        self.replace(CartSnapshot::default());
        Ok(outcome)
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The server's item count from the current snapshot.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .item_count
    }

    /// Whether a product appears in the current snapshot.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(product_id)
    }

    /// Reset the snapshot to empty without a network call.
    ///
    /// Used when the session ends: the server cart belongs to the token,
    /// not to this process.
    pub fn reset(&self) {
        self.replace(CartSnapshot::default());
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.tx.subscribe()
    }
}
