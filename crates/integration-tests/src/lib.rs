//! Integration tests for Fresh Cart.
//!
//! Store-level tests run the real session/cart/wishlist stores against a
//! `wiremock` mock of the commerce API. No live network, no credentials:
//! every test owns its own mock server and storage.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fresh-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - mirror semantics, auth guard, quantity updates
//! - `session_store` - sign-in, rehydration, sign-out resets
//! - `checkout` - payment branches and cart reset

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use wiremock::MockServer;

use fresh_cart_storefront::commerce::CommerceClient;
use fresh_cart_storefront::config::CommerceApiConfig;
use fresh_cart_storefront::stores::{LocalStorage, MemoryStorage, UserStores, storage_keys};

/// A mock commerce API with a store bundle wired to it.
pub struct TestContext {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub stores: UserStores,
}

impl TestContext {
    /// Start a mock commerce API and build a signed-out store bundle
    /// against it.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStorage::new());
        let stores = UserStores::with_storage(client_for(&server), storage.clone());

        Self {
            server,
            storage,
            stores,
        }
    }

    /// As [`TestContext::new`], but with a token for `user_id` already
    /// persisted - the store bundle rehydrates signed in. Returns the
    /// token alongside so tests can assert on the header.
    pub async fn signed_in(user_id: &str) -> (Self, String) {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStorage::new());
        let token = make_token(user_id);
        storage.set(storage_keys::USER_TOKEN, &token);
        let stores = UserStores::with_storage(client_for(&server), storage.clone());

        (
            Self {
                server,
                storage,
                stores,
            },
            token,
        )
    }
}

/// A commerce client pointed at the mock server.
#[must_use]
pub fn client_for(server: &MockServer) -> CommerceClient {
    CommerceClient::new(&CommerceApiConfig {
        base_url: server.uri(),
        checkout_return_url: "http://localhost:3000".to_string(),
    })
}

/// A commerce client pointed at a port nothing listens on.
#[must_use]
pub fn unreachable_client() -> CommerceClient {
    CommerceClient::new(&CommerceApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        checkout_return_url: "http://localhost:3000".to_string(),
    })
}

/// Build an unsigned session token whose payload claims `user_id`.
#[must_use]
pub fn make_token(user_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "id": user_id, "name": "Test User", "iat": 1_700_000_000 })
            .to_string()
            .as_bytes(),
    );
    format!("{header}.{payload}.signature")
}

/// Build a cart response document the way the commerce API shapes it.
///
/// `lines` is `(product_id, quantity, unit_price)` per cart line.
#[must_use]
pub fn cart_response(
    cart_id: &str,
    owner: &str,
    lines: &[(&str, u32, u32)],
    total: u32,
) -> Value {
    let products: Vec<Value> = lines
        .iter()
        .map(|(id, quantity, price)| {
            json!({
                "count": quantity,
                "price": price,
                "product": {
                    "_id": id,
                    "title": format!("Product {id}"),
                    "imageCover": format!("https://cdn.example/{id}.jpg"),
                    "ratingsAverage": 4.5
                }
            })
        })
        .collect();

    json!({
        "status": "success",
        "numOfCartItems": lines.len(),
        "cartId": cart_id,
        "data": {
            "_id": cart_id,
            "cartOwner": owner,
            "products": products,
            "totalCartPrice": total
        }
    })
}
