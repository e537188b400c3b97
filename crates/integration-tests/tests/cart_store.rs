//! Cart store tests: mirror semantics, the auth guard, and failure
//! behavior, all against a mock commerce API.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use fresh_cart_core::{Price, ProductId};
use fresh_cart_integration_tests::{TestContext, cart_response};
use fresh_cart_storefront::commerce::CommerceError;
use fresh_cart_storefront::commerce::types::CartResponse;
use fresh_cart_storefront::stores::CartSnapshot;

/// The snapshot a given mock document must produce.
fn expected_snapshot(document: &serde_json::Value) -> CartSnapshot {
    let response: CartResponse =
        serde_json::from_value(document.clone()).expect("mock document must parse");
    CartSnapshot::from(response)
}

#[tokio::test]
async fn snapshot_mirrors_server_document_across_mutation_sequence() {
    let (ctx, token) = TestContext::signed_in("u1").await;
    let p1 = ProductId::new("p1");
    let p2 = ProductId::new("p2");

    // add p1
    let after_add = cart_response("c1", "u1", &[("p1", 1, 50)], 50);
    Mock::given(method("POST"))
        .and(path("/cart"))
        .and(header("token", token.as_str()))
        .and(body_json(json!({ "productId": "p1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(after_add.clone()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let snapshot = ctx.stores.cart().add(&p1).await.expect("add should succeed");
    assert_eq!(snapshot, expected_snapshot(&after_add));

    // raise p1 to 2
    let after_update = cart_response("c1", "u1", &[("p1", 2, 50)], 100);
    Mock::given(method("PUT"))
        .and(path("/cart/p1"))
        .and(header("token", token.as_str()))
        .and(body_json(json!({ "count": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(after_update.clone()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let snapshot = ctx
        .stores
        .cart()
        .update_quantity(&p1, 2)
        .await
        .expect("update should succeed");
    assert_eq!(snapshot, expected_snapshot(&after_update));

    // add p2, then remove it again - each reply fully replaces the mirror
    let after_second_add = cart_response("c1", "u1", &[("p1", 2, 50), ("p2", 1, 30)], 130);
    Mock::given(method("POST"))
        .and(path("/cart"))
        .and(body_json(json!({ "productId": "p2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(after_second_add.clone()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let snapshot = ctx.stores.cart().add(&p2).await.expect("add should succeed");
    assert_eq!(snapshot, expected_snapshot(&after_second_add));

    let after_remove = cart_response("c1", "u1", &[("p1", 2, 50)], 100);
    Mock::given(method("DELETE"))
        .and(path("/cart/p2"))
        .and(header("token", token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(after_remove.clone()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let snapshot = ctx
        .stores
        .cart()
        .remove(&p2)
        .await
        .expect("remove should succeed");
    assert_eq!(snapshot, expected_snapshot(&after_remove));
    assert_eq!(ctx.stores.cart().snapshot(), expected_snapshot(&after_remove));
}

#[tokio::test]
async fn mutations_without_token_fail_fast_with_zero_network_calls() {
    let ctx = TestContext::new().await;
    let p1 = ProductId::new("p1");

    // Any request reaching the server fails the test
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&ctx.server)
        .await;

    assert!(matches!(
        ctx.stores.cart().add(&p1).await,
        Err(CommerceError::MissingAuth)
    ));
    assert!(matches!(
        ctx.stores.cart().update_quantity(&p1, 3).await,
        Err(CommerceError::MissingAuth)
    ));
    assert!(matches!(
        ctx.stores.cart().remove(&p1).await,
        Err(CommerceError::MissingAuth)
    ));
    assert!(matches!(
        ctx.stores.cart().clear().await,
        Err(CommerceError::MissingAuth)
    ));

    // Dropping ctx.server verifies the expect(0)
}

#[tokio::test]
async fn update_quantity_adopts_server_total() {
    let (ctx, token) = TestContext::signed_in("u1").await;
    let p1 = ProductId::new("p1");

    // cart starts with one line: p1 x2 at 50
    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("token", token.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_response("c1", "u1", &[("p1", 2, 50)], 100)),
        )
        .mount(&ctx.server)
        .await;
    ctx.stores.cart().fetch().await.expect("fetch should succeed");
    let mut updates = ctx.stores.cart().subscribe();
    updates.mark_unchanged();

    // server replies to the quantity change with total 150
    Mock::given(method("PUT"))
        .and(path("/cart/p1"))
        .and(body_json(json!({ "count": 3 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_response("c1", "u1", &[("p1", 3, 50)], 150)),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let snapshot = ctx
        .stores
        .cart()
        .update_quantity(&p1, 3)
        .await
        .expect("update should succeed");

    assert_eq!(snapshot.total_price, Price::from(150u32));
    assert_eq!(snapshot.items[0].count, 3);

    // Subscribers saw the replacement
    assert!(updates.has_changed().expect("sender should be alive"));
    assert_eq!(updates.borrow_and_update().total_price, Price::from(150u32));
}

#[tokio::test]
async fn clear_leaves_empty_cart_with_zero_total() {
    let (ctx, token) = TestContext::signed_in("u1").await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_response("c1", "u1", &[("p1", 2, 50)], 100)),
        )
        .mount(&ctx.server)
        .await;
    ctx.stores.cart().fetch().await.expect("fetch should succeed");
    assert_eq!(ctx.stores.cart().item_count(), 1);

    Mock::given(method("DELETE"))
        .and(path("/cart"))
        .and(header("token", token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "success" })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.stores.cart().clear().await.expect("clear should succeed");

    let snapshot = ctx.stores.cart().snapshot();
    assert!(snapshot.items.is_empty());
    assert!(snapshot.total_price.is_zero());
    assert_eq!(snapshot.cart_id, None);
}

#[tokio::test]
async fn failed_mutation_keeps_previous_snapshot() {
    let (ctx, _token) = TestContext::signed_in("u1").await;
    let document = cart_response("c1", "u1", &[("p1", 1, 50)], 50);

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document.clone()))
        .mount(&ctx.server)
        .await;
    ctx.stores.cart().fetch().await.expect("fetch should succeed");

    Mock::given(method("POST"))
        .and(path("/cart"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "cart service down" })),
        )
        .mount(&ctx.server)
        .await;

    let err = ctx
        .stores
        .cart()
        .add(&ProductId::new("p2"))
        .await
        .expect_err("add should fail");
    assert_eq!(err.user_message(), "cart service down");

    // No optimistic update was retained across the failed request
    assert_eq!(ctx.stores.cart().snapshot(), expected_snapshot(&document));
}

#[tokio::test]
async fn server_message_is_surfaced_on_rejection() {
    let (ctx, _token) = TestContext::signed_in("u1").await;

    Mock::given(method("POST"))
        .and(path("/cart"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Expired Token. please login again" })),
        )
        .mount(&ctx.server)
        .await;

    let err = ctx
        .stores
        .cart()
        .add(&ProductId::new("p1"))
        .await
        .expect_err("add should fail");
    assert_eq!(err.user_message(), "Expired Token. please login again");
}
