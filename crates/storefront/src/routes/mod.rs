//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (guarded)
//! GET  /health                 - Health check
//!
//! # Catalog (guarded)
//! GET  /products               - Product listing (?category={id} filters)
//! GET  /products/{id}          - Product detail
//! GET  /categories             - Category listing
//! GET  /brands                 - Brand listing
//!
//! # Cart (guarded, HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add product (returns count badge, triggers cart-updated)
//! POST /cart/update            - Set quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove product (returns cart_items fragment)
//! POST /cart/clear             - Clear cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout & Orders (guarded)
//! GET  /checkout               - Checkout page
//! POST /checkout               - Place order (cash) or redirect to hosted payment (online)
//! GET  /orders                 - Order history
//!
//! # Wishlist (guarded)
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/toggle        - Toggle liked state (returns heart fragment)
//! POST /wishlist/remove        - Remove from wishlist
//!
//! # Auth (public)
//! GET  /login                  - Sign-in page
//! POST /login                  - Sign-in action
//! GET  /register               - Registration page
//! POST /register               - Registration action
//! GET  /forgot-password        - Password reset request page
//! POST /forgot-password        - Password reset request action
//! POST /logout                 - Sign-out action
//! ```

pub mod auth;
pub mod brands;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;
pub mod wishlist;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    routing::{get, post},
};

use crate::filters;
use crate::middleware::Stores;
use crate::state::AppState;
use crate::stores::UserStores;

/// Navbar display data, rebuilt from the stores on every page render.
#[derive(Clone)]
pub struct NavView {
    pub signed_in: bool,
    pub user_name: Option<String>,
    pub cart_count: u32,
    pub wishlist_count: usize,
}

impl NavView {
    /// Build the navbar view from a session's store bundle.
    #[must_use]
    pub fn from_stores(stores: &UserStores) -> Self {
        let identity = stores.session().identity();
        Self {
            signed_in: identity.is_some(),
            user_name: identity.and_then(|i| i.name),
            cart_count: stores.cart().item_count(),
            wishlist_count: stores.wishlist().len(),
        }
    }
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "notfound.html")]
pub struct NotFoundTemplate {
    pub nav: NavView,
}

/// Fallback handler for unknown paths.
pub async fn not_found(Stores(stores): Stores) -> NotFoundTemplate {
    NotFoundTemplate {
        nav: NavView::from_stores(&stores),
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog routes
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(categories::index))
        .route("/brands", get(brands::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout & orders
        .route("/checkout", get(checkout::page).post(checkout::submit))
        .route("/orders", get(orders::index))
        // Wishlist routes
        .nest("/wishlist", wishlist_routes())
        // Auth routes
        .merge(auth_routes())
        // Unknown paths
        .fallback(not_found)
}
