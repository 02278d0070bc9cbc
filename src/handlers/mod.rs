//! HTTP 处理器模块

pub mod auth;
pub mod category;
pub mod health;
pub mod item;
pub mod public;
pub mod terms;

use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

/// JSON 请求体提取器
///
/// 与 `axum::Json` 相同，但解析失败时返回统一的 `AppError` 响应，
/// 不把 serde 的解析细节透传给客户端。
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
