//! Checkout route handlers.
//!
//! Checkout branches on the payment method: `online` creates a hosted
//! payment session and redirects the browser to it; `cash` completes
//! synchronously and lands on the order history page. There is no
//! idempotency key and no client-side double-submit protection - a
//! repeated submit can place duplicate orders upstream. Known
//! limitation of the external API, left visible rather than papered
//! over.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fresh_cart_core::{PhoneNumber, Price};

use crate::commerce::types::ShippingAddress;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::stores::{CheckoutOutcome, PaymentMethod, UserStores};

use super::NavView;

/// Shipping details length bounds, matching the registration-side rules.
const MIN_DETAILS_LENGTH: usize = 10;
const MAX_DETAILS_LENGTH: usize = 200;
const MIN_CITY_LENGTH: usize = 3;

/// Checkout form data.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    pub details: String,
    pub phone: String,
    pub city: String,
    pub payment_method: PaymentMethod,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: NavView,
    pub total: Price,
    pub item_count: u32,
    pub details: String,
    pub phone: String,
    pub city: String,
    pub error: Option<String>,
}

impl CheckoutTemplate {
    fn blank(stores: &UserStores) -> Self {
        let snapshot = stores.cart().snapshot();
        Self {
            nav: NavView::from_stores(stores),
            total: snapshot.total_price,
            item_count: snapshot.item_count,
            details: String::new(),
            phone: String::new(),
            city: String::new(),
            error: None,
        }
    }

    fn with_error(stores: &UserStores, form: CheckoutForm, error: String) -> Self {
        Self {
            details: form.details,
            phone: form.phone,
            city: form.city,
            error: Some(error),
            ..Self::blank(stores)
        }
    }
}

/// Validate the shipping form. Failures never reach the network.
fn validate(form: &CheckoutForm) -> std::result::Result<ShippingAddress, String> {
    let details = form.details.trim();
    if details.len() < MIN_DETAILS_LENGTH {
        return Err("Please provide more detailed shipping information".to_string());
    }
    if details.len() > MAX_DETAILS_LENGTH {
        return Err("Shipping details too long".to_string());
    }

    let phone = PhoneNumber::parse(form.phone.trim())
        .map_err(|_| "Please enter a valid Egyptian phone number".to_string())?;

    let city = form.city.trim();
    if city.len() < MIN_CITY_LENGTH || !city.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err("Please enter a valid city name".to_string());
    }

    Ok(ShippingAddress {
        details: details.to_string(),
        phone: phone.to_string(),
        city: city.to_string(),
    })
}

/// Display the checkout page.
#[instrument(skip(auth))]
pub async fn page(auth: RequireAuth) -> CheckoutTemplate {
    // Refresh the mirror so the order summary matches the server
    if let Err(e) = auth.stores.cart().fetch().await {
        tracing::warn!("Failed to refresh cart for checkout: {e}");
    }

    CheckoutTemplate::blank(&auth.stores)
}

/// Handle checkout form submission.
#[instrument(skip(auth, form))]
pub async fn submit(auth: RequireAuth, Form(form): Form<CheckoutForm>) -> Response {
    let shipping = match validate(&form) {
        Ok(shipping) => shipping,
        Err(message) => {
            return CheckoutTemplate::with_error(&auth.stores, form, message).into_response();
        }
    };

    // The cart id comes from the snapshot; make sure we hold one before
    // asking the server to order it
    if auth.stores.cart().snapshot().cart_id.is_none()
        && let Err(e) = auth.stores.cart().fetch().await
    {
        tracing::warn!("Failed to fetch cart before checkout: {e}");
    }

    match auth.stores.cart().checkout(&shipping, form.payment_method).await {
        Ok(CheckoutOutcome::RedirectToPayment(url)) => Redirect::to(&url).into_response(),
        Ok(CheckoutOutcome::OrderPlaced) => Redirect::to("/orders").into_response(),
        Err(e) => {
            tracing::error!("Checkout failed: {e}");
            CheckoutTemplate::with_error(&auth.stores, form, e.user_message()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(details: &str, phone: &str, city: &str) -> CheckoutForm {
        CheckoutForm {
            details: details.to_string(),
            phone: phone.to_string(),
            city: city.to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_shipping() {
        let shipping = validate(&form("12 Nile St, Apt 4, Zamalek", "01012345678", "Cairo"));
        assert!(shipping.is_ok());
    }

    #[test]
    fn test_validate_rejects_short_details() {
        assert!(validate(&form("short", "01012345678", "Cairo")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_phone() {
        assert!(validate(&form("12 Nile St, Apt 4", "12345", "Cairo")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_city() {
        assert!(validate(&form("12 Nile St, Apt 4", "01012345678", "C4iro")).is_err());
    }
}
