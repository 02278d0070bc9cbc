//! 条款处理器（hoster）

use crate::{
    auth::middleware::Identity, error::AppError, middleware::AppState,
    models::terms::TermsRequest,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::ApiJson;

pub async fn create_terms(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ApiJson(req): ApiJson<TermsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let terms = state.terms_service.create(&identity, req).await?;
    Ok((StatusCode::CREATED, Json(terms)))
}

pub async fn list_own_terms(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.terms_service.list_own(&identity).await?))
}

pub async fn get_own_terms(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.terms_service.get_own(&identity, &id).await?))
}

pub async fn update_terms(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TermsRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.terms_service.update(&identity, &id, req).await?))
}

pub async fn delete_terms(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.terms_service.delete(&identity, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
