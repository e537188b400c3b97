//! Commerce API client implementation.
//!
//! One method per REST endpoint, with `reqwest` for HTTP and `moka` for
//! catalog caching (5-minute TTL). Cart and order methods always hit the
//! network; their responses replace store state wholesale.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use fresh_cart_core::{CartId, CategoryId, ProductId, UserId};

use crate::config::CommerceApiConfig;

use super::cache::CacheValue;
use super::types::{
    AddToCartRequest, ApiDoc, ApiErrorBody, ApiMessage, ApiPage, AuthResponse, Brand, CartResponse,
    CashOrderResponse, Category, CheckoutSession, CheckoutSessionResponse, CreateOrderRequest,
    ForgotPasswordRequest, Order, Product, ShippingAddress, SignInRequest, SignUpRequest,
    UpdateCartItemRequest,
};
use super::{CommerceError, TOKEN_HEADER};

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the remote commerce API.
///
/// Provides typed access to auth, catalog, cart, and order endpoints.
/// Catalog listings are cached for 5 minutes.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    http: reqwest::Client,
    base_url: String,
    checkout_return_url: String,
    cache: Cache<String, CacheValue>,
}

impl CommerceClient {
    /// Create a new commerce API client.
    #[must_use]
    pub fn new(config: &CommerceApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CommerceClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                checkout_return_url: config.checkout_return_url.clone(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request and parse the response body.
    ///
    /// Non-success statuses are decoded as the API's error body and
    /// surfaced with the server's `message` field when present.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CommerceError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&response_text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(
                status = %status,
                message = %message,
                "Commerce API rejected request"
            );
            return Err(CommerceError::Rejected {
                status: Some(status),
                message,
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse commerce API response"
                );
                Err(CommerceError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Sign an existing user in, returning the issued token and identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the API request fails.
    #[instrument(skip(self, request))]
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, CommerceError> {
        let response: AuthResponse = self
            .execute(self.inner.http.post(self.url("/auth/signin")).json(request))
            .await?;
        ensure_success(&response.message, "Sign in failed")?;
        Ok(response)
    }

    /// Register a new user, returning the issued token and identity.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the API request fails.
    #[instrument(skip(self, request))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, CommerceError> {
        let response: AuthResponse = self
            .execute(self.inner.http.post(self.url("/auth/signup")).json(request))
            .await?;
        ensure_success(&response.message, "Registration failed")?;
        Ok(response)
    }

    /// Request a password reset code for an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the address or the request fails.
    #[instrument(skip(self, email))]
    pub async fn forgot_password(&self, email: &str) -> Result<ApiMessage, CommerceError> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.execute(
            self.inner
                .http
                .post(self.url("/auth/forgotPasswords"))
                .json(&request),
        )
        .await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CommerceError> {
        const CACHE_KEY: &str = "products";

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let page: ApiPage<Product> = self.execute(self.inner.http.get(self.url("/products"))).await?;

        self.inner
            .cache
            .insert(CACHE_KEY.to_string(), CacheValue::Products(page.data.clone()))
            .await;

        Ok(page.data)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, CommerceError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let doc: ApiDoc<Product> = self
            .execute(self.inner.http.get(self.url(&format!("/products/{product_id}"))))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(doc.data.clone())))
            .await;

        Ok(doc.data)
    }

    /// Get the products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn get_products_in_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, CommerceError> {
        let cache_key = format!("products:category:{category_id}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let page: ApiPage<Product> = self
            .execute(
                self.inner
                    .http
                    .get(self.url("/products"))
                    .query(&[("category[in]", category_id.as_str())]),
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.data.clone()))
            .await;

        Ok(page.data)
    }

    /// Get the category listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, CommerceError> {
        const CACHE_KEY: &str = "categories";

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(CACHE_KEY).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let page: ApiPage<Category> = self
            .execute(self.inner.http.get(self.url("/categories")))
            .await?;

        self.inner
            .cache
            .insert(
                CACHE_KEY.to_string(),
                CacheValue::Categories(page.data.clone()),
            )
            .await;

        Ok(page.data)
    }

    /// Get the brand listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_brands(&self) -> Result<Vec<Brand>, CommerceError> {
        const CACHE_KEY: &str = "brands";

        if let Some(CacheValue::Brands(brands)) = self.inner.cache.get(CACHE_KEY).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }

        let page: ApiPage<Brand> = self.execute(self.inner.http.get(self.url("/brands"))).await?;

        self.inner
            .cache
            .insert(CACHE_KEY.to_string(), CacheValue::Brands(page.data.clone()))
            .await;

        Ok(page.data)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Fetch the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &str) -> Result<CartResponse, CommerceError> {
        let response: CartResponse = self
            .execute(self.inner.http.get(self.url("/cart")).header(TOKEN_HEADER, token))
            .await?;
        ensure_success(&response.status, "Failed to fetch cart")?;
        Ok(response)
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<CartResponse, CommerceError> {
        let request = AddToCartRequest {
            product_id: product_id.clone(),
        };
        let response: CartResponse = self
            .execute(
                self.inner
                    .http
                    .post(self.url("/cart"))
                    .header(TOKEN_HEADER, token)
                    .json(&request),
            )
            .await?;
        ensure_success(&response.status, "Failed to add item to cart")?;
        Ok(response)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id, count))]
    pub async fn update_cart_item(
        &self,
        token: &str,
        product_id: &ProductId,
        count: u32,
    ) -> Result<CartResponse, CommerceError> {
        let request = UpdateCartItemRequest { count };
        let response: CartResponse = self
            .execute(
                self.inner
                    .http
                    .put(self.url(&format!("/cart/{product_id}")))
                    .header(TOKEN_HEADER, token)
                    .json(&request),
            )
            .await?;
        ensure_success(&response.status, "Failed to update quantity")?;
        Ok(response)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<CartResponse, CommerceError> {
        let response: CartResponse = self
            .execute(
                self.inner
                    .http
                    .delete(self.url(&format!("/cart/{product_id}")))
                    .header(TOKEN_HEADER, token),
            )
            .await?;
        ensure_success(&response.status, "Failed to remove item from cart")?;
        Ok(response)
    }

    /// Delete the cart outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &str) -> Result<(), CommerceError> {
        let response: ApiMessage = self
            .execute(
                self.inner
                    .http
                    .delete(self.url("/cart"))
                    .header(TOKEN_HEADER, token),
            )
            .await?;
        ensure_success(&response.message, "Failed to clear cart")?;
        Ok(())
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place a cash-on-delivery order for a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token, shipping), fields(cart_id = %cart_id))]
    pub async fn create_cash_order(
        &self,
        token: &str,
        cart_id: &CartId,
        shipping: &ShippingAddress,
    ) -> Result<(), CommerceError> {
        let request = CreateOrderRequest {
            shipping_address: shipping.clone(),
        };
        let response: CashOrderResponse = self
            .execute(
                self.inner
                    .http
                    .post(self.url(&format!("/orders/{cart_id}")))
                    .header(TOKEN_HEADER, token)
                    .json(&request),
            )
            .await?;
        ensure_success(&response.status, "Payment processing failed")?;
        Ok(())
    }

    /// Create a hosted payment session for a cart.
    ///
    /// The returned session URL is externally hosted; the caller is
    /// expected to redirect the browser there. No idempotency key is
    /// sent - a repeated submit can produce duplicate orders upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token, shipping), fields(cart_id = %cart_id))]
    pub async fn create_checkout_session(
        &self,
        token: &str,
        cart_id: &CartId,
        shipping: &ShippingAddress,
    ) -> Result<CheckoutSession, CommerceError> {
        let request = CreateOrderRequest {
            shipping_address: shipping.clone(),
        };
        let response: CheckoutSessionResponse = self
            .execute(
                self.inner
                    .http
                    .post(self.url(&format!("/orders/checkout-session/{cart_id}")))
                    .query(&[("url", self.inner.checkout_return_url.as_str())])
                    .header(TOKEN_HEADER, token)
                    .json(&request),
            )
            .await?;
        ensure_success(&response.status, "Payment processing failed")?;
        Ok(response.session)
    }

    /// Get a user's order history.
    ///
    /// The upstream API does not require the token header on this
    /// endpoint; it is keyed by user id alone. Mirrored as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_orders(&self, user_id: &UserId) -> Result<Vec<Order>, CommerceError> {
        self.execute(
            self.inner
                .http
                .get(self.url(&format!("/orders/user/{user_id}"))),
        )
        .await
    }
}

/// Check the API's in-body success flag.
///
/// Some endpoints report failure with a 200 status and a non-`success`
/// flag; those become [`CommerceError::Rejected`] with the given message.
fn ensure_success(flag: &str, failure_message: &str) -> Result<(), CommerceError> {
    if flag == "success" {
        Ok(())
    } else {
        Err(CommerceError::Rejected {
            status: None,
            message: failure_message.to_string(),
        })
    }
}
