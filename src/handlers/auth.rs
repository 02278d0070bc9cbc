//! 账户相关的 HTTP 处理器

use crate::{
    auth::{middleware::Identity, role::Role},
    error::AppError,
    middleware::AppState,
    models::{account::*, auth::RefreshTokenRequest},
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use super::ApiJson;

/// 注册管理员
pub async fn register_admin(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterAdminRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.register_admin(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// 注册 hoster
pub async fn register_hoster(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterHosterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.register_hoster(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// 注册 customer
pub async fn register_customer(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.register_customer(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login_admin(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auth_service.login(Role::Admin, req).await?))
}

pub async fn login_hoster(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auth_service.login(Role::Hoster, req).await?))
}

pub async fn login_customer(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auth_service.login(Role::Customer, req).await?))
}

/// 刷新令牌
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auth_service.refresh(req).await?))
}

/// 获取当前身份
pub async fn me(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auth_service.me(&identity)))
}

pub async fn hoster_detail(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auth_service.hoster_detail(&identity).await?))
}

pub async fn customer_profile(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auth_service.customer_profile(&identity).await?))
}
