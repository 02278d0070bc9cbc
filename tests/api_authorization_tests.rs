//! 认证与角色授权集成测试

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use lalan_service::auth::{jwt::TokenService, role::Role};
use serde_json::json;

mod common;
use common::create_test_app;

#[tokio::test]
async fn test_missing_token() {
    let app = create_test_app();

    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "missing_token");
    assert_eq!(body["error"]["message"], "Token required");
}

#[tokio::test]
async fn test_basic_scheme_is_malformed() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header(header::AUTHORIZATION, "Basic xyz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send_request(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "malformed_token");
    assert_eq!(body["error"]["message"], "Invalid token format");
}

#[tokio::test]
async fn test_garbage_bearer_token() {
    let app = create_test_app();

    let (status, body) = app
        .send(Method::GET, "/api/v1/auth/me", Some("invalid_token"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "malformed_token");
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_share_message() {
    let app = create_test_app();

    let expired = app
        .tokens
        .issue_at("h-1", Role::Hoster, 1_000_000)
        .unwrap()
        .access_token;
    let foreign = TokenService::new(b"a_completely_different_secret_value!!", 3600)
        .issue("h-1", Role::Hoster)
        .unwrap()
        .access_token;

    for token in [expired, foreign] {
        let (status, body) = app
            .send(Method::GET, "/api/v1/auth/me", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["kind"], "invalid_token");
        assert_eq!(body["error"]["message"], "Invalid or expired token");
    }
}

#[tokio::test]
async fn test_hoster_token_on_admin_route_is_forbidden() {
    let app = create_test_app();
    let token = app.token_for("h-1", Role::Hoster);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/admin/category",
            Some(&token),
            Some(json!({"name": "Camping"})),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "forbidden_role");
    assert_eq!(body["error"]["message"], "Admin access required");
    // handler 未执行
    assert!(app.store.categories.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_customer_token_on_hoster_route_is_forbidden() {
    let app = create_test_app();
    let token = app.token_for("c-1", Role::Customer);

    let (status, body) = app
        .send(Method::GET, "/api/v1/hoster/items", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Hoster access required");
}

#[tokio::test]
async fn test_admin_token_on_customer_route_is_forbidden() {
    let app = create_test_app();
    let token = app.token_for("a-1", Role::Admin);

    let (status, _) = app
        .send(Method::GET, "/api/v1/customer/profile", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_error_response_carries_request_metadata() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/api/v1/hoster/items")
        .header("x-trace-id", "trace-abc")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = app.send_with_headers(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers["x-trace-id"], "trace-abc");

    // 错误体中的 request_id 与响应头一致，便于对照服务端日志
    let header_id = headers["x-request-id"].to_str().unwrap();
    assert_eq!(body["error"]["request_id"], header_id);
}
