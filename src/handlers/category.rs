//! 分类管理处理器（管理员）

use crate::{error::AppError, middleware::AppState, models::category::CategoryRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::ApiJson;

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.category_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.category_service.update(&id, req).await?))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.category_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
