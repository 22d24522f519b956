//! Integration tests for the storefront route table.
//!
//! Each test spawns its own in-process server, so cart state never leaks
//! between tests.

use minishop_integration_tests::TestServer;
use reqwest::{StatusCode, header};

async fn get(server: &TestServer, path: &str) -> (StatusCode, String) {
    let resp = TestServer::client()
        .get(server.url(path))
        .send()
        .await
        .expect("Failed to send request");
    let status = resp.status();
    let body = resp.text().await.expect("Failed to read response");
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn().await;
    let (status, body) = get(&server, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_home_lists_catalog() {
    let server = TestServer::spawn().await;
    let (status, body) = get(&server, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Welcome to our E-Commerce Store"));
    for id in 1..=3 {
        assert!(body.contains(&format!("href=\"/product/{id}\"")));
        assert!(body.contains(&format!("href=\"/add_to_cart/{id}\">Add to Cart</a>")));
        assert!(body.contains(&format!("Product {id}")));
    }
    assert!(body.contains("$100.00"));
    assert!(body.contains("href=\"/login\">Login</a>"));
}

#[tokio::test]
async fn test_product_detail() {
    let server = TestServer::spawn().await;
    let (status, body) = get(&server, "/product/2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Product 2"));
    assert!(body.contains("$200.00"));
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let server = TestServer::spawn().await;

    for path in [
        "/product/0",
        "/product/4",
        "/product/999",
        "/product/2147483648",
        "/product/99999999999",
    ] {
        let (status, body) = get(&server, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, "Product not found", "{path}");
    }
}

#[tokio::test]
async fn test_non_integer_product_path_is_404() {
    let server = TestServer::spawn().await;

    for path in [
        "/product/abc",
        "/product/-1",
        "/product/1.5",
        "/add_to_cart/abc",
        "/add_to_cart/-1",
        "/remove_from_cart/abc",
    ] {
        let (status, body) = get(&server, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_ne!(body, "Product not found", "{path}");
    }
}

#[tokio::test]
async fn test_description_page() {
    let server = TestServer::spawn().await;
    let (status, body) = get(&server, "/description").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("About"));
}

#[tokio::test]
async fn test_login_page_form() {
    let server = TestServer::spawn().await;
    let (status, body) = get(&server, "/login").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"username\""));
    assert!(body.contains("id=\"password\""));
    assert!(body.contains("<button type=\"submit\""));
}

#[tokio::test]
async fn test_checkout_has_back_to_home() {
    let server = TestServer::spawn().await;
    let (status, body) = get(&server, "/checkout").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<a href=\"/\">Back to Home</a>"));
    assert!(body.contains("Total: $0.00"));
    assert!(body.contains("0 items"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = TestServer::spawn().await;
    let (status, _) = get(&server, "/products").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_stylesheet() {
    let server = TestServer::spawn().await;
    let resp = TestServer::client()
        .get(server.url("/static/css/main.css"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .expect("Invalid content type");
    assert!(content_type.starts_with("text/css"));
}

#[tokio::test]
async fn test_response_headers() {
    let server = TestServer::spawn().await;
    let resp = TestServer::client()
        .get(server.url("/"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .expect("Failed to send request");

    let headers = resp.headers();
    assert_eq!(headers["x-request-id"], "trace-me");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store, max-age=0");
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
}
