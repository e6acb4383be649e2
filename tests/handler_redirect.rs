mod common;

use axum_test::TestServer;
use hashlink::domain::repositories::ShortUrlRepository;
use hashlink::routes::api_router;
use serde_json::Value;

#[tokio::test]
async fn test_redirect_success() {
    let (state, repo) = common::create_test_state();
    common::create_test_record(&repo, "abcd1234", "https://example.com/target").await;
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.get("/abcd1234").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_counts_hits() {
    let (state, repo) = common::create_test_state();
    common::create_test_record(&repo, "abcd1234", "https://example.com/target").await;
    let server = TestServer::new(api_router(state)).unwrap();

    server.get("/abcd1234").await;
    let record = repo.find_by_id("abcd1234").await.unwrap().unwrap();
    assert_eq!(record.hit_count, 1);

    server.get("/abcd1234").await;
    let record = repo.find_by_id("abcd1234").await.unwrap().unwrap();
    assert_eq!(record.hit_count, 2);
}

#[tokio::test]
async fn test_redirect_wrong_length_skips_store() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    for id in ["abc", "abcd12345", "0123456789abcdef"] {
        let response = server.get(&format!("/{id}")).await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"]["code"], "invalid_identifier");
    }

    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.get("/ffffffff").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_store_unavailable() {
    let (state, repo) = common::create_test_state();
    common::create_test_record(&repo, "abcd1234", "https://example.com/target").await;
    repo.set_offline(true);
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.get("/abcd1234").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_redirect_method_not_allowed() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();

    let response = server.post("/abcd1234").await;

    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}
