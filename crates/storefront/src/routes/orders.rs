//! Order history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use fresh_cart_core::{OrderId, Price};

use crate::commerce::types::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::NavView;

/// One line of a past order.
#[derive(Clone)]
pub struct OrderLineView {
    pub title: String,
    pub quantity: u32,
    pub unit_price: Price,
}

/// Past order display data.
#[derive(Clone)]
pub struct OrderView {
    pub id: OrderId,
    pub total: Price,
    pub payment_method: String,
    pub is_paid: bool,
    pub is_delivered: bool,
    pub placed_at: Option<String>,
    pub items: Vec<OrderLineView>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            total: order.total_order_price,
            payment_method: order
                .payment_method_type
                .unwrap_or_else(|| "cash".to_string()),
            is_paid: order.is_paid,
            is_delivered: order.is_delivered,
            placed_at: order
                .created_at
                .map(|at| at.format("%b %e, %Y").to_string()),
            items: order
                .cart_items
                .into_iter()
                .map(|line| OrderLineView {
                    title: line.product.title,
                    quantity: line.count,
                    unit_price: line.price,
                })
                .collect(),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub nav: NavView,
    pub orders: Vec<OrderView>,
}

/// Display the signed-in user's order history.
#[instrument(skip(state, auth))]
pub async fn index(State(state): State<AppState>, auth: RequireAuth) -> Result<OrdersIndexTemplate> {
    let orders = state
        .commerce()
        .get_user_orders(&auth.identity.user_id)
        .await?
        .into_iter()
        .map(OrderView::from)
        .collect();

    Ok(OrdersIndexTemplate {
        nav: NavView::from_stores(&auth.stores),
        orders,
    })
}
