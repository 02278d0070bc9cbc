//! 路由注册
//! 创建所有 API 路由并应用中间件
//!
//! 受保护路由的顺序固定为：认证 → 角色 → handler（→ 所有权检查在服务层）。

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::{
        jwt::TokenService,
        middleware::{require_authentication, require_role, RoleGate},
        role::Role,
    },
    config::AppConfig,
    handlers,
    middleware::{request_tracking_middleware, AppState},
};

/// 给一组路由挂上认证与角色检查
fn guarded(
    routes: Router<Arc<AppState>>,
    tokens: Arc<TokenService>,
    gate: RoleGate,
) -> Router<Arc<AppState>> {
    // 后添加的 route_layer 在外层，所以认证先于角色检查执行
    routes
        .route_layer(from_fn_with_state(gate, require_role))
        .route_layer(from_fn_with_state(tokens, require_authentication))
}

/// 仅认证，不限角色
fn authenticated(routes: Router<Arc<AppState>>, tokens: Arc<TokenService>) -> Router<Arc<AppState>> {
    routes.route_layer(from_fn_with_state(tokens, require_authentication))
}

/// CORS：开发环境允许任意来源，生产环境只允许配置的来源
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.app.environment.is_development() {
        return cors.allow_origin(Any);
    }

    match config
        .server
        .cors_allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
    {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("Ignoring invalid CORS origin in configuration");
            cors
        }
        None => cors,
    }
}

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let tokens = state.tokens.clone();

    // 公开端点（健康检查、目录）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/v1/public/category", get(handlers::public::list_categories))
        .route("/api/v1/public/item", get(handlers::public::list_items))
        .route("/api/v1/public/item/{id}", get(handlers::public::get_item))
        .route("/api/v1/public/tnc", get(handlers::public::list_terms));

    // 注册与登录（无需认证）
    let mut auth_routes = Router::new()
        .route("/api/v1/admin/login", post(handlers::auth::login_admin))
        .route("/api/v1/hoster/register", post(handlers::auth::register_hoster))
        .route("/api/v1/hoster/login", post(handlers::auth::login_hoster))
        .route("/api/v1/customer/register", post(handlers::auth::register_customer))
        .route("/api/v1/customer/login", post(handlers::auth::login_customer))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh_token));

    let admin_register = Router::new().route(
        "/api/v1/admin/register",
        post(handlers::auth::register_admin),
    );

    // 管理员注册默认需要管理员令牌
    let admin_register = if state.config.security.admin_registration_open {
        tracing::warn!("Admin registration is open to anonymous callers");
        admin_register
    } else {
        guarded(admin_register, tokens.clone(), RoleGate::only(Role::Admin))
    };
    auth_routes = auth_routes.merge(admin_register);

    // 任意已认证身份
    let me_routes = authenticated(
        Router::new().route("/api/v1/auth/me", get(handlers::auth::me)),
        tokens.clone(),
    );

    // 管理员：分类管理
    let admin_routes = guarded(
        Router::new()
            .route("/api/v1/admin/category", post(handlers::category::create_category))
            .route(
                "/api/v1/admin/category/{id}",
                put(handlers::category::update_category)
                    .delete(handlers::category::delete_category),
            ),
        tokens.clone(),
        RoleGate::only(Role::Admin),
    );

    // hoster：资料、物品、条款
    let hoster_routes = guarded(
        Router::new()
            .route("/api/v1/hoster/detail", get(handlers::auth::hoster_detail))
            .route(
                "/api/v1/hoster/items",
                get(handlers::item::list_own_items).post(handlers::item::create_item),
            )
            .route(
                "/api/v1/hoster/items/{id}",
                get(handlers::item::get_own_item)
                    .put(handlers::item::update_item)
                    .delete(handlers::item::delete_item),
            )
            .route(
                "/api/v1/hoster/terms",
                get(handlers::terms::list_own_terms).post(handlers::terms::create_terms),
            )
            .route(
                "/api/v1/hoster/terms/{id}",
                get(handlers::terms::get_own_terms)
                    .put(handlers::terms::update_terms)
                    .delete(handlers::terms::delete_terms),
            ),
        tokens.clone(),
        RoleGate::only(Role::Hoster),
    );

    // customer：个人资料
    let customer_routes = guarded(
        Router::new().route("/api/v1/customer/profile", get(handlers::auth::customer_profile)),
        tokens,
        RoleGate::only(Role::Customer),
    );

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(me_routes)
        .merge(admin_routes)
        .merge(hoster_routes)
        .merge(customer_routes)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_tracking_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}
