//! Commerce API request and response schemas.
//!
//! Every endpoint gets an explicit schema, parsed at the boundary before
//! anything reaches a store. The API spells identifiers `_id` and uses
//! camelCase field names; unknown fields are ignored so upstream additions
//! do not break parsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fresh_cart_core::{BrandId, CartId, CategoryId, OrderId, Price, ProductId, UserId};

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /auth/signin`.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
    pub phone: String,
}

/// Body of `POST /auth/forgotPasswords`.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Successful response of the sign-in and sign-up endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    /// `"success"` on the happy path.
    pub message: String,
    pub token: String,
    pub user: AuthUser,
}

/// The user document embedded in an [`AuthResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Response of endpoints that only carry a message (e.g. password reset
/// request, clearing the cart).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Error body the API returns on rejected requests.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A paginated catalog listing (`products`, `categories`, `brands`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiPage<T> {
    #[serde(default)]
    pub results: Option<u64>,
    #[serde(default)]
    pub metadata: Option<PageMetadata>,
    pub data: Vec<T>,
}

/// A single-document response (`products/{id}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiDoc<T> {
    pub data: T,
}

/// Pagination metadata on listing responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub number_of_pages: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub next_page: Option<u32>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub price_after_discount: Option<Price>,
    pub image_cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Category,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub ratings_average: f32,
    #[serde(default)]
    pub ratings_quantity: u32,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub sold: Option<u64>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A product brand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// Response of every cart read and mutation. The `data` document is the
/// authoritative cart; local state mirrors it verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    /// `"success"` on the happy path.
    pub status: String,
    #[serde(default)]
    pub num_of_cart_items: u32,
    #[serde(default)]
    pub cart_id: Option<CartId>,
    pub data: CartDocument,
}

/// The cart document owned by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDocument {
    #[serde(rename = "_id")]
    pub id: CartId,
    pub cart_owner: UserId,
    #[serde(default)]
    pub products: Vec<CartLine>,
    #[serde(default)]
    pub total_cart_price: Price,
}

/// One line of a cart or order: a product reference with unit price and
/// quantity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartLine {
    pub count: u32,
    pub price: Price,
    pub product: CartProduct,
}

/// The trimmed product document embedded in cart and order lines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub image_cover: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub ratings_average: f32,
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Body of `PUT /cart/{productId}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCartItemRequest {
    pub count: u32,
}

// =============================================================================
// Orders & Checkout
// =============================================================================

/// The shipping address collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub details: String,
    pub phone: String,
    pub city: String,
}

/// Body of the order-creation endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_address: ShippingAddress,
}

/// Response of `POST /orders/{cartId}` (cash on delivery).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CashOrderResponse {
    /// `"success"` on the happy path.
    pub status: String,
}

/// Response of `POST /orders/checkout-session/{cartId}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSessionResponse {
    /// `"success"` on the happy path.
    pub status: String,
    pub session: CheckoutSession,
}

/// The externally hosted payment session the browser is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// A past order, as returned by `GET /orders/user/{userId}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub payment_method_type: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_delivered: bool,
    pub total_order_price: Price,
    #[serde(default)]
    pub cart_items: Vec<CartLine>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
