//! Session store tests: sign-in, rehydration, sign-out, and error
//! surfacing against a mock commerce API.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use fresh_cart_core::UserId;
use fresh_cart_integration_tests::{
    TestContext, cart_response, make_token, unreachable_client,
};
use fresh_cart_storefront::commerce::CommerceError;
use fresh_cart_storefront::commerce::types::SignInRequest;
use fresh_cart_storefront::stores::{
    LocalStorage, MemoryStorage, UserStores, storage_keys,
};

fn credentials() -> SignInRequest {
    SignInRequest {
        email: "ahmed@example.com".to_string(),
        password: "Secret@123".to_string(),
    }
}

#[tokio::test]
async fn sign_in_persists_token_and_derives_identity() {
    let ctx = TestContext::new().await;
    let token = make_token("640ab1f38f1a");

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_json(json!({
            "email": "ahmed@example.com",
            "password": "Secret@123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "success",
            "user": { "name": "Ahmed", "email": "ahmed@example.com", "role": "user" },
            "token": token
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let identity = ctx
        .stores
        .session()
        .sign_in(&credentials())
        .await
        .expect("sign in should succeed");

    assert_eq!(identity.user_id, UserId::new("640ab1f38f1a"));
    assert_eq!(ctx.storage.get(storage_keys::USER_TOKEN), Some(token.clone()));
    assert_eq!(
        ctx.stores
            .session()
            .token()
            .expect("token should be held")
            .expose_secret(),
        token
    );
}

#[tokio::test]
async fn rehydration_matches_identity_encoded_in_persisted_token() {
    let (ctx, _token) = TestContext::signed_in("640ab1f38f1a").await;

    let identity = ctx
        .stores
        .session()
        .identity()
        .expect("rehydrated session should be signed in");
    assert_eq!(identity.user_id, UserId::new("640ab1f38f1a"));
    assert_eq!(identity.name.as_deref(), Some("Test User"));
}

#[tokio::test]
async fn rejected_sign_in_surfaces_server_message_and_keeps_state() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Incorrect email or password" })),
        )
        .mount(&ctx.server)
        .await;

    let err = ctx
        .stores
        .session()
        .sign_in(&credentials())
        .await
        .expect_err("sign in should fail");

    assert_eq!(err.user_message(), "Incorrect email or password");
    assert!(!ctx.stores.session().is_signed_in());
    assert_eq!(ctx.storage.get(storage_keys::USER_TOKEN), None);
}

#[tokio::test]
async fn unreachable_server_yields_generic_message() {
    let stores = UserStores::with_storage(unreachable_client(), Arc::new(MemoryStorage::new()));

    let err = stores
        .session()
        .sign_in(&credentials())
        .await
        .expect_err("sign in should fail");

    assert!(matches!(err, CommerceError::Http(_)));
    assert_eq!(
        err.user_message(),
        "No response from server. Please try again later."
    );
}

#[tokio::test]
async fn sign_up_signs_the_new_user_in() {
    let ctx = TestContext::new().await;
    let token = make_token("brand-new-user");

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({
            "name": "Ahmed",
            "email": "ahmed@example.com",
            "password": "Secret@123",
            "rePassword": "Secret@123",
            "phone": "01012345678"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "success",
            "user": { "name": "Ahmed", "email": "ahmed@example.com", "role": "user" },
            "token": token
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let registration = fresh_cart_storefront::commerce::types::SignUpRequest {
        name: "Ahmed".to_string(),
        email: "ahmed@example.com".to_string(),
        password: "Secret@123".to_string(),
        re_password: "Secret@123".to_string(),
        phone: "01012345678".to_string(),
    };

    let identity = ctx
        .stores
        .session()
        .sign_up(&registration)
        .await
        .expect("sign up should succeed");

    assert_eq!(identity.user_id, UserId::new("brand-new-user"));
    assert!(ctx.stores.session().is_signed_in());
}

#[tokio::test]
async fn sign_out_clears_token_and_resets_cart() {
    let (ctx, _token) = TestContext::signed_in("u1").await;

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

    ctx.stores.sign_out();

    assert!(!ctx.stores.session().is_signed_in());
    assert_eq!(ctx.storage.get(storage_keys::USER_TOKEN), None);

    let snapshot = ctx.stores.cart().snapshot();
    assert!(snapshot.items.is_empty());
    assert!(snapshot.total_price.is_zero());
}
