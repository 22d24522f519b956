//! Integration tests for cart mutation, cart scopes and checkout.

use minishop_integration_tests::{TestServer, test_config};
use minishop_storefront::config::CartScope;
use reqwest::{Client, StatusCode, header};

/// Product IDs in the cart, read from the remove links on `/cart`.
async fn cart_ids(client: &Client, server: &TestServer) -> Vec<i32> {
    let body = client
        .get(server.url("/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .text()
        .await
        .expect("Failed to read cart");

    body.split("href=\"/remove_from_cart/")
        .skip(1)
        .map(|rest| {
            rest.split('"')
                .next()
                .and_then(|id| id.parse().ok())
                .expect("Malformed remove link")
        })
        .collect()
}

async fn expect_redirect(client: &Client, url: String, location: &str) {
    let resp = client.get(url).send().await.expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], location);
}

#[tokio::test]
async fn test_add_three_remove_one() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();

    assert!(cart_ids(&client, &server).await.is_empty());

    for id in [1, 2, 3] {
        expect_redirect(&client, server.url(&format!("/add_to_cart/{id}")), "/").await;
    }
    assert_eq!(cart_ids(&client, &server).await, vec![1, 2, 3]);

    expect_redirect(&client, server.url("/remove_from_cart/1"), "/cart").await;
    assert_eq!(cart_ids(&client, &server).await, vec![2, 3]);
}

#[tokio::test]
async fn test_duplicates_and_remove_all() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();

    for id in [2, 1, 2] {
        expect_redirect(&client, server.url(&format!("/add_to_cart/{id}")), "/").await;
    }
    assert_eq!(cart_ids(&client, &server).await, vec![2, 1, 2]);

    expect_redirect(&client, server.url("/remove_from_cart/2"), "/cart").await;
    assert_eq!(cart_ids(&client, &server).await, vec![1]);

    // Idempotent
    expect_redirect(&client, server.url("/remove_from_cart/2"), "/cart").await;
    assert_eq!(cart_ids(&client, &server).await, vec![1]);
}

#[tokio::test]
async fn test_add_unknown_product_is_silent() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();

    expect_redirect(&client, server.url("/add_to_cart/1"), "/").await;
    expect_redirect(&client, server.url("/add_to_cart/99"), "/").await;

    assert_eq!(cart_ids(&client, &server).await, vec![1]);
}

#[tokio::test]
async fn test_huge_product_ids_are_unknown() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();

    expect_redirect(&client, server.url("/add_to_cart/2"), "/").await;
    expect_redirect(&client, server.url("/add_to_cart/99999999999"), "/").await;
    assert_eq!(cart_ids(&client, &server).await, vec![2]);

    expect_redirect(&client, server.url("/remove_from_cart/2147483648"), "/cart").await;
    assert_eq!(cart_ids(&client, &server).await, vec![2]);
}

#[tokio::test]
async fn test_post_mutations_are_accepted() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();

    let resp = client
        .post(server.url("/add_to_cart/3"))
        .send()
        .await
        .expect("Failed to post");
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(cart_ids(&client, &server).await, vec![3]);

    let resp = client
        .post(server.url("/remove_from_cart/3"))
        .send()
        .await
        .expect("Failed to post");
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(cart_ids(&client, &server).await.is_empty());
}

#[tokio::test]
async fn test_checkout_shows_total_and_keeps_cart() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();

    for id in [1, 3] {
        expect_redirect(&client, server.url(&format!("/add_to_cart/{id}")), "/").await;
    }

    let body = client
        .get(server.url("/checkout"))
        .send()
        .await
        .expect("Failed to get checkout")
        .text()
        .await
        .expect("Failed to read checkout");
    assert!(body.contains("Total: $400.00"));
    assert!(body.contains("2 items"));
    assert!(body.contains("Back to Home"));

    assert_eq!(cart_ids(&client, &server).await, vec![1, 3]);
}

#[tokio::test]
async fn test_shared_cart_is_global() {
    let server = TestServer::spawn().await;
    let alice = TestServer::client();
    let bob = TestServer::client();

    expect_redirect(&alice, server.url("/add_to_cart/1"), "/").await;
    expect_redirect(&bob, server.url("/add_to_cart/2"), "/").await;

    assert_eq!(cart_ids(&alice, &server).await, vec![1, 2]);
    assert_eq!(cart_ids(&bob, &server).await, vec![1, 2]);
}

#[tokio::test]
async fn test_session_carts_are_isolated() {
    let mut config = test_config();
    config.cart_scope = CartScope::Session;
    let server = TestServer::spawn_with(config).await;
    let alice = TestServer::client();
    let bob = TestServer::client();

    expect_redirect(&alice, server.url("/add_to_cart/1"), "/").await;
    expect_redirect(&alice, server.url("/add_to_cart/3"), "/").await;
    expect_redirect(&bob, server.url("/add_to_cart/2"), "/").await;

    assert_eq!(cart_ids(&alice, &server).await, vec![1, 3]);
    assert_eq!(cart_ids(&bob, &server).await, vec![2]);
}
