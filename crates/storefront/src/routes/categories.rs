//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use fresh_cart_core::CategoryId;

use crate::commerce::types::Category;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::NavView;

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryCardView {
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
}

impl From<Category> for CategoryCardView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            image: category.image,
        }
    }
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub nav: NavView,
    pub categories: Vec<CategoryCardView>,
}

/// Display the category listing page.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<CategoriesIndexTemplate> {
    let categories = state
        .commerce()
        .get_categories()
        .await?
        .into_iter()
        .map(CategoryCardView::from)
        .collect();

    Ok(CategoriesIndexTemplate {
        nav: NavView::from_stores(&auth.stores),
        categories,
    })
}
