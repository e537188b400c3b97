//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation goes through the session's [`CartStore`], so the page
//! always renders the server's latest cart document.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fresh_cart_core::{Price, ProductId};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::stores::{CartSnapshot, CartStore};

use super::NavView;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub image: Option<String>,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Price,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Price::ZERO,
            item_count: 0,
        }
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot
                .items
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product.id.clone(),
                    title: line.product.title.clone(),
                    image: line.product.image_cover.clone(),
                    unit_price: line.price,
                    quantity: line.count,
                    line_total: line.price.times(line.count),
                })
                .collect(),
            total: snapshot.total_price,
            item_count: snapshot.item_count,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip(auth))]
pub async fn show(auth: RequireAuth) -> CartShowTemplate {
    let (cart, error) = match auth.stores.cart().fetch().await {
        Ok(snapshot) => (CartView::from(&snapshot), None),
        Err(e) => {
            tracing::warn!("Failed to fetch cart: {e}");
            (CartView::empty(), Some(e.user_message()))
        }
    };

    CartShowTemplate {
        nav: NavView::from_stores(&auth.stores),
        cart,
        error,
    }
}

/// Add a product to the cart (HTMX).
///
/// Returns the cart count badge plus an HTMX trigger so other fragments
/// refresh themselves.
#[instrument(skip(auth))]
pub async fn add(auth: RequireAuth, Form(form): Form<AddToCartForm>) -> Response {
    let product_id = ProductId::new(form.product_id);

    match auth.stores.cart().add(&product_id).await {
        Ok(snapshot) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: snapshot.item_count,
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"text-red-500\">Error adding to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Set a cart line's quantity (HTMX).
#[instrument(skip(auth))]
pub async fn update(auth: RequireAuth, Form(form): Form<UpdateCartForm>) -> Response {
    let product_id = ProductId::new(form.product_id);

    match auth
        .stores
        .cart()
        .update_quantity(&product_id, form.quantity)
        .await
    {
        Ok(snapshot) => items_fragment(&snapshot),
        Err(e) => {
            tracing::error!("Failed to update cart quantity: {e}");
            stale_items_fragment(auth.stores.cart())
        }
    }
}

/// Remove a product from the cart (HTMX).
#[instrument(skip(auth))]
pub async fn remove(auth: RequireAuth, Form(form): Form<RemoveFromCartForm>) -> Response {
    let product_id = ProductId::new(form.product_id);

    match auth.stores.cart().remove(&product_id).await {
        Ok(snapshot) => items_fragment(&snapshot),
        Err(e) => {
            tracing::error!("Failed to remove from cart: {e}");
            stale_items_fragment(auth.stores.cart())
        }
    }
}

/// Clear the cart (HTMX).
#[instrument(skip(auth))]
pub async fn clear(auth: RequireAuth) -> Response {
    match auth.stores.cart().clear().await {
        Ok(()) => items_fragment(&CartSnapshot::default()),
        Err(e) => {
            tracing::error!("Failed to clear cart: {e}");
            stale_items_fragment(auth.stores.cart())
        }
    }
}

/// Get the cart count badge (HTMX).
///
/// Reads the current snapshot; no network call.
#[instrument(skip(auth))]
pub async fn count(auth: RequireAuth) -> CartCountTemplate {
    CartCountTemplate {
        count: auth.stores.cart().item_count(),
    }
}

/// Render the items fragment for a fresh snapshot, triggering a badge
/// refresh.
fn items_fragment(snapshot: &CartSnapshot) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(snapshot),
        },
    )
        .into_response()
}

/// Render the items fragment from whatever snapshot we still hold. Used
/// after a failed mutation: no optimistic update was applied, so the
/// previous snapshot stands.
fn stale_items_fragment(store: &CartStore) -> Response {
    CartItemsTemplate {
        cart: CartView::from(&store.snapshot()),
    }
    .into_response()
}
