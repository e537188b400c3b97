//! Checkout tests: both payment branches, the cart reset, and the
//! guard ordering, against a mock commerce API.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use fresh_cart_integration_tests::{TestContext, cart_response};
use fresh_cart_storefront::commerce::CommerceError;
use fresh_cart_storefront::commerce::types::ShippingAddress;
use fresh_cart_storefront::stores::{CheckoutOutcome, PaymentMethod};

fn shipping() -> ShippingAddress {
    ShippingAddress {
        details: "12 Nile St, Apt 4, Zamalek".to_string(),
        phone: "01012345678".to_string(),
        city: "Cairo".to_string(),
    }
}

/// Fetch once so the store knows its cart id.
async fn seed_cart(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_response("c1", "u1", &[("p1", 2, 50)], 100)),
        )
        .mount(&ctx.server)
        .await;
    ctx.stores.cart().fetch().await.expect("fetch should succeed");
}

#[tokio::test]
async fn cash_checkout_places_order_and_empties_cart() {
    let (ctx, token) = TestContext::signed_in("u1").await;
    seed_cart(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/orders/c1"))
        .and(header("token", token.as_str()))
        .and(body_json(json!({
            "shippingAddress": {
                "details": "12 Nile St, Apt 4, Zamalek",
                "phone": "01012345678",
                "city": "Cairo"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let outcome = ctx
        .stores
        .cart()
        .checkout(&shipping(), PaymentMethod::CashOnDelivery)
        .await
        .expect("checkout should succeed");

    assert_eq!(outcome, CheckoutOutcome::OrderPlaced);

    let snapshot = ctx.stores.cart().snapshot();
    assert!(snapshot.items.is_empty());
    assert!(snapshot.total_price.is_zero());
}

#[tokio::test]
async fn online_checkout_returns_hosted_payment_url() {
    let (ctx, token) = TestContext::signed_in("u1").await;
    seed_cart(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/orders/checkout-session/c1"))
        .and(query_param("url", "http://localhost:3000"))
        .and(header("token", token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "session": { "url": "https://pay.example/session/123" }
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let outcome = ctx
        .stores
        .cart()
        .checkout(&shipping(), PaymentMethod::Online)
        .await
        .expect("checkout should succeed");

    assert_eq!(
        outcome,
        CheckoutOutcome::RedirectToPayment("https://pay.example/session/123".to_string())
    );
    assert!(ctx.stores.cart().snapshot().items.is_empty());
}

#[tokio::test]
async fn checkout_without_cart_is_rejected_before_any_network_call() {
    let (ctx, _token) = TestContext::signed_in("u1").await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let err = ctx
        .stores
        .cart()
        .checkout(&shipping(), PaymentMethod::CashOnDelivery)
        .await
        .expect_err("checkout should fail without a cart");

    assert_eq!(err.user_message(), "Please add products to cart first");
}

#[tokio::test]
async fn checkout_without_token_fails_fast() {
    let ctx = TestContext::new().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&ctx.server)
        .await;

    assert!(matches!(
        ctx.stores
            .cart()
            .checkout(&shipping(), PaymentMethod::Online)
            .await,
        Err(CommerceError::MissingAuth)
    ));
}

#[tokio::test]
async fn failed_checkout_keeps_the_cart() {
    let (ctx, _token) = TestContext::signed_in("u1").await;
    seed_cart(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/orders/c1"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "cart is empty" })),
        )
        .mount(&ctx.server)
        .await;

    let err = ctx
        .stores
        .cart()
        .checkout(&shipping(), PaymentMethod::CashOnDelivery)
        .await
        .expect_err("checkout should fail");
    assert_eq!(err.user_message(), "cart is empty");

    // The snapshot was not cleared: no optimistic reset on failure
    assert_eq!(ctx.stores.cart().item_count(), 1);
}
