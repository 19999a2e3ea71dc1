//! Integration tests for delegated search and image uploads.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p quadmarket-api)
//! - Reachable search and storage services
//!
//! Run with: cargo test -p quadmarket-integration-tests -- --ignored

use quadmarket_integration_tests::{api_base_url, client, session_token};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and a reachable search service"]
async fn test_search_short_query_is_400() {
    let client = client();
    let base_url = api_base_url();

    for q in ["", "a", "%20%20"] {
        let resp = client
            .get(format!("{base_url}/search?q={q}"))
            .send()
            .await
            .expect("search failed");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "q: {q:?}");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and a reachable search service"]
async fn test_search_returns_results_array() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/search?q=lamp&type=marketplace&maxPrice=100"))
        .send()
        .await
        .expect("search failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("invalid body");
    assert!(body["results"].is_array());
}

#[tokio::test]
#[ignore = "Requires running API server and a reachable search service"]
async fn test_search_invalid_filters_are_400() {
    let client = client();
    let base_url = api_base_url();

    for query in ["q=lamp&type=sublet", "q=lamp&condition=Mint"] {
        let resp = client
            .get(format!("{base_url}/search?{query}"))
            .send()
            .await
            .expect("search failed");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "query: {query}");
    }
}

// ============================================================================
// Uploads
// ============================================================================

fn png_part(name: &str) -> Part {
    // Minimal PNG header; the API validates MIME type and size, not pixels.
    let bytes: Vec<u8> = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    Part::bytes(bytes)
        .file_name(name.to_owned())
        .mime_str("image/png")
        .expect("valid mime")
}

#[tokio::test]
#[ignore = "Requires running API server and a reachable storage service"]
async fn test_upload_returns_urls_in_order() {
    let client = client();
    let base_url = api_base_url();

    let form = Form::new()
        .part("images", png_part("first.png"))
        .part("images", png_part("second.png"));

    let resp = client
        .post(format!("{base_url}/upload/images"))
        .bearer_auth(session_token())
        .multipart(form)
        .send()
        .await
        .expect("upload failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("invalid body");
    let urls = body["urls"].as_array().expect("urls");
    assert_eq!(urls.len(), 2);
    assert!(urls[0].as_str().expect("url").contains("first.png"));
    assert!(urls[1].as_str().expect("url").contains("second.png"));
}

#[tokio::test]
#[ignore = "Requires running API server and a reachable storage service"]
async fn test_upload_more_than_five_images_is_400() {
    let client = client();
    let base_url = api_base_url();

    let mut form = Form::new();
    for i in 0..6 {
        form = form.part("images", png_part(&format!("img-{i}.png")));
    }

    let resp = client
        .post(format!("{base_url}/upload/images"))
        .bearer_auth(session_token())
        .multipart(form)
        .send()
        .await
        .expect("upload failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("invalid body");
    assert_eq!(body["error"], "Maximum 5 images allowed");
}

#[tokio::test]
#[ignore = "Requires running API server and a reachable storage service"]
async fn test_upload_disallowed_mime_is_400() {
    let client = client();
    let base_url = api_base_url();

    let part = Part::bytes(vec![0x47, 0x49, 0x46])
        .file_name("anim.gif")
        .mime_str("image/gif")
        .expect("valid mime");

    let resp = client
        .post(format!("{base_url}/upload/images"))
        .bearer_auth(session_token())
        .multipart(Form::new().part("images", part))
        .send()
        .await
        .expect("upload failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and a reachable storage service"]
async fn test_upload_without_token_is_401() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/upload/images"))
        .multipart(Form::new().part("images", png_part("a.png")))
        .send()
        .await
        .expect("upload failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
