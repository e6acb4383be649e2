mod common;

use axum_test::TestServer;
use hashlink::routes::api_router;
use serde_json::{Value, json};

#[tokio::test]
async fn test_shorten_success() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com", "meta": { "campaign": "spring" } }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["id"], "c984d06a");
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(json["hitCount"], 0);
    assert_eq!(json["meta"], json!({ "campaign": "spring" }));
}

#[tokio::test]
async fn test_shorten_without_meta() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/docs" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["id"].as_str().unwrap().len(), 8);
    assert_eq!(json["meta"], Value::Null);
}

#[tokio::test]
async fn test_shorten_same_url_twice_returns_same_record() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let first = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com", "meta": { "owner": "first" } }))
        .await
        .json::<Value>();

    let second = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com", "meta": { "owner": "second" } }))
        .await
        .json::<Value>();

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["meta"], json!({ "owner": "first" }));

    let stored = server
        .get("/shorten")
        .add_query_param("shortId", first["id"].as_str().unwrap())
        .await;
    stored.assert_status_ok();
    assert!(repo.calls() > 0);
}

#[tokio::test]
async fn test_shorten_slides_past_taken_window() {
    let (state, repo) = common::create_test_state();
    common::create_test_record(&repo, "c984d06a", "https://other.example").await;
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], "984d06aa");
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "not-a-valid-url" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_rejects_control_characters() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    for url in ["https://example.com/a\nb", "https://example.com/a\tb"] {
        let response = server.post("/shorten").json(&json!({ "url": url })).await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }

    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_shorten_rejects_url_over_byte_limit() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();
    let url = format!("https://example.com/{}", "\u{e9}".repeat(1100));

    let response = server.post("/shorten").json(&json!({ "url": url })).await;

    response.assert_status_bad_request();
    let reason = response.json::<Value>()["error"]["details"]["reason"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(reason.contains("bytes"));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_shorten_rejects_unsupported_scheme() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_empty_url() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.post("/shorten").json(&json!({ "url": "" })).await;

    response.assert_status_bad_request();
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_shorten_malformed_body() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .content_type("application/json")
        .bytes("{\"url\": ".into())
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_shorten_missing_url_field() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "meta": { "campaign": "spring" } }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_store_unavailable() {
    let (state, repo) = common::create_test_state();
    repo.set_offline(true);
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "store_unavailable");
    assert!(
        !json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("connection refused")
    );
}

#[tokio::test]
async fn test_shorten_method_not_allowed() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.delete("/shorten").await;

    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}
