//! Home page route handler.
//!
//! Mirrors the storefront landing page: a category strip over the
//! product grid, both one-shot catalog fetches.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::NavView;
use super::categories::CategoryCardView;
use super::products::ProductCardView;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub categories: Vec<CategoryCardView>,
    pub products: Vec<ProductCardView>,
}

/// Display the home page.
#[instrument(skip(state, auth))]
pub async fn home(State(state): State<AppState>, auth: RequireAuth) -> Result<HomeTemplate> {
    let (categories, products) = tokio::join!(
        state.commerce().get_categories(),
        state.commerce().get_products(),
    );

    // A broken category strip should not take the whole page down
    let categories = categories
        .map_err(|e| tracing::warn!("Failed to fetch categories for home page: {e}"))
        .unwrap_or_default()
        .into_iter()
        .map(CategoryCardView::from)
        .collect();

    let products = products?
        .into_iter()
        .map(|p| ProductCardView::build(p, &auth.stores))
        .collect();

    Ok(HomeTemplate {
        nav: NavView::from_stores(&auth.stores),
        categories,
        products,
    })
}
