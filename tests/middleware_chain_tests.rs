//! 中间件组合测试：认证 → 角色 → handler 的顺序与合取语义

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use lalan_service::auth::{
    jwt::TokenService,
    middleware::{current_role, current_user_id, require_authentication, require_role, RoleGate},
    role::Role,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;

const SECRET: &[u8] = b"middleware-chain-secret-32-characters";

/// 计数 handler：记录被调用次数并回显身份
fn probe_router(gates: &[RoleGate], hits: Arc<AtomicUsize>, with_auth: bool) -> Router {
    let tokens = Arc::new(TokenService::new(SECRET, 3600));

    let mut router = Router::new().route(
        "/probe",
        get(move |req: Request<Body>| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                format!(
                    "{}:{}",
                    current_user_id(req.extensions()),
                    current_role(req.extensions())
                )
            }
        }),
    );

    // 最后添加的在最外层，所以逆序添加 gate
    for gate in gates.iter().rev() {
        router = router.route_layer(from_fn_with_state(*gate, require_role));
    }
    if with_auth {
        router = router.route_layer(from_fn_with_state(tokens, require_authentication));
    }
    router
}

fn request_as(role: Role) -> Request<Body> {
    let token = TokenService::new(SECRET, 3600)
        .issue("u1", role)
        .unwrap()
        .access_token;
    Request::builder()
        .uri("/probe")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_matching_role_reaches_handler_with_identity() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = probe_router(&[RoleGate::only(Role::Hoster)], hits.clone(), true);

    let response = app.oneshot(request_as(Role::Hoster)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    assert_eq!(&body[..], b"u1:hoster");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_admin_then_hoster_gates_reject_everyone() {
    for role in Role::ALL {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = probe_router(
            &[RoleGate::only(Role::Admin), RoleGate::only(Role::Hoster)],
            hits.clone(),
            true,
        );

        let response = app.oneshot(request_as(role)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "role {}", role);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_role_gate_without_authentication_fails_closed() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = probe_router(&[RoleGate::any_of(&Role::ALL)], hits.clone(), false);

    let response = app.oneshot(request_as(Role::Admin)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_token_never_reaches_role_gate_or_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = probe_router(&[RoleGate::only(Role::Admin)], hits.clone(), true);

    let request = Request::builder()
        .uri("/probe")
        .header(header::AUTHORIZATION, "Basic xyz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
