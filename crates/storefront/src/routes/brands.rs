//! Brand route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use fresh_cart_core::BrandId;

use crate::commerce::types::Brand;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::NavView;

/// Brand display data for templates.
#[derive(Clone)]
pub struct BrandCardView {
    pub id: BrandId,
    pub name: String,
    pub image: Option<String>,
}

impl From<Brand> for BrandCardView {
    fn from(brand: Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name,
            image: brand.image,
        }
    }
}

/// Brand listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "brands/index.html")]
pub struct BrandsIndexTemplate {
    pub nav: NavView,
    pub brands: Vec<BrandCardView>,
}

/// Display the brand listing page.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<BrandsIndexTemplate> {
    let brands = state
        .commerce()
        .get_brands()
        .await?
        .into_iter()
        .map(BrandCardView::from)
        .collect();

    Ok(BrandsIndexTemplate {
        nav: NavView::from_stores(&auth.stores),
        brands,
    })
}
