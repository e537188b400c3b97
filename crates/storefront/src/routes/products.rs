//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use fresh_cart_core::{CategoryId, Price, ProductId};

use crate::commerce::CommerceError;
use crate::commerce::types::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;
use crate::stores::UserStores;

use super::NavView;

/// How many related products to show on a product page.
const RELATED_LIMIT: usize = 4;

/// Product display data for card grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub price_after_discount: Option<Price>,
    pub image: String,
    pub category_name: String,
    pub rating: f32,
    pub liked: bool,
    pub in_cart: bool,
}

impl ProductCardView {
    /// Build a card from a catalog product, marking liked/in-cart state
    /// from the session's stores.
    #[must_use]
    pub fn build(product: Product, stores: &UserStores) -> Self {
        Self {
            liked: stores.wishlist().is_liked(&product.id),
            in_cart: stores.cart().contains(&product.id),
            id: product.id,
            title: product.title,
            price: product.price,
            price_after_discount: product.price_after_discount,
            image: product.image_cover,
            category_name: product.category.name,
            rating: product.ratings_average,
        }
    }
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub price: Price,
    pub price_after_discount: Option<Price>,
    pub image: String,
    pub images: Vec<String>,
    pub category_name: String,
    pub brand_name: Option<String>,
    pub rating: f32,
    pub ratings_quantity: u32,
    pub liked: bool,
    pub in_cart: bool,
}

impl ProductDetailView {
    fn build(product: Product, stores: &UserStores) -> Self {
        Self {
            liked: stores.wishlist().is_liked(&product.id),
            in_cart: stores.cart().contains(&product.id),
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            price_after_discount: product.price_after_discount,
            image: product.image_cover,
            images: product.images,
            category_name: product.category.name,
            brand_name: product.brand.map(|b| b.name),
            rating: product.ratings_average,
            ratings_quantity: product.ratings_quantity,
        }
    }
}

/// Listing filter query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavView,
    pub heading: String,
    pub products: Vec<ProductCardView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: ProductDetailView,
    pub related: Vec<ProductCardView>,
}

/// Display the product listing page, optionally filtered to one category.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    auth: RequireAuth,
    Query(query): Query<ListingQuery>,
) -> Result<ProductsIndexTemplate> {
    let (heading, products) = match query.category {
        Some(category) => {
            let category_id = CategoryId::new(category);
            let products = state.commerce().get_products_in_category(&category_id).await?;
            let heading = products
                .first()
                .map_or_else(|| "Products".to_string(), |p| p.category.name.clone());
            (heading, products)
        }
        None => ("All Products".to_string(), state.commerce().get_products().await?),
    };

    let products = products
        .into_iter()
        .map(|p| ProductCardView::build(p, &auth.stores))
        .collect();

    Ok(ProductsIndexTemplate {
        nav: NavView::from_stores(&auth.stores),
        heading,
        products,
    })
}

/// Display the product detail page.
#[instrument(skip(state, auth), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let product_id = ProductId::new(id);
    let product = state
        .commerce()
        .get_product(&product_id)
        .await
        .map_err(|e| match &e {
            CommerceError::Rejected {
                status: Some(status),
                ..
            } if *status == reqwest::StatusCode::NOT_FOUND => {
                AppError::NotFound(format!("product {product_id}"))
            }
            _ => AppError::from(e),
        })?;

    let related = state
        .commerce()
        .get_products_in_category(&product.category.id)
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|p| p.id != product.id)
        .take(RELATED_LIMIT)
        .map(|p| ProductCardView::build(p, &auth.stores))
        .collect();

    Ok(ProductShowTemplate {
        nav: NavView::from_stores(&auth.stores),
        product: ProductDetailView::build(product, &auth.stores),
        related,
    })
}
