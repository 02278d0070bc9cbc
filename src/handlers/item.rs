//! 物品处理器（hoster）

use crate::{
    auth::middleware::Identity, error::AppError, middleware::AppState, models::item::ItemRequest,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::ApiJson;

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ApiJson(req): ApiJson<ItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.item_service.create(&identity, req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_own_items(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.item_service.list_own(&identity).await?))
}

pub async fn get_own_item(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.item_service.get_own(&identity, &id).await?))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.item_service.update(&identity, &id, req).await?))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.item_service.delete(&identity, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
