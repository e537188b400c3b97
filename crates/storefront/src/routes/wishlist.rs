//! Wishlist route handlers.
//!
//! The wishlist is client-local: the page fetches the catalog and keeps
//! only the liked ids, exactly as the browser storefront did. Nothing
//! here talks to a server-side wishlist, because none exists.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fresh_cart_core::ProductId;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::NavView;
use super::products::ProductCardView;

/// Wishlist toggle/remove form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: String,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistTemplate {
    pub nav: NavView,
    pub products: Vec<ProductCardView>,
}

/// Wishlist heart button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_button.html")]
pub struct WishlistButtonTemplate {
    pub product_id: ProductId,
    pub liked: bool,
}

/// Display the wishlist page.
#[instrument(skip(state, auth))]
pub async fn show(State(state): State<AppState>, auth: RequireAuth) -> Result<WishlistTemplate> {
    let wishlist = auth.stores.wishlist();

    let products = if wishlist.is_empty() {
        Vec::new()
    } else {
        state
            .commerce()
            .get_products()
            .await?
            .into_iter()
            .filter(|p| wishlist.is_liked(&p.id))
            .map(|p| ProductCardView::build(p, &auth.stores))
            .collect()
    };

    Ok(WishlistTemplate {
        nav: NavView::from_stores(&auth.stores),
        products,
    })
}

/// Toggle a product's liked state (HTMX).
///
/// Toggling twice restores the original membership.
#[instrument(skip(auth))]
pub async fn toggle(auth: RequireAuth, Form(form): Form<WishlistForm>) -> Response {
    let product_id = ProductId::new(form.product_id);
    let liked = auth.stores.wishlist().toggle(&product_id);

    (
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        WishlistButtonTemplate { product_id, liked },
    )
        .into_response()
}

/// Remove a product from the wishlist and reload the page.
#[instrument(skip(auth))]
pub async fn remove(auth: RequireAuth, Form(form): Form<WishlistForm>) -> Redirect {
    let product_id = ProductId::new(form.product_id);
    auth.stores.wishlist().remove(&product_id);
    Redirect::to("/wishlist")
}
