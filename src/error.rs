//! 统一错误模型
//! 定义所有错误类型和错误响应格式
//!
//! 每个错误都有稳定的 kind（机器可读）和安全的 message（人类可读），
//! 内部细节只写入日志，不会返回给客户端。

use crate::auth::{jwt::TokenError, password::PasswordError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization header missing")]
    MissingToken,

    #[error("Authorization header is not a bearer token")]
    MalformedToken,

    #[error("Token rejected: {0}")]
    Token(#[from] TokenError),

    #[error("No authenticated identity on request")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Role not permitted: {0}")]
    ForbiddenRole(String),

    #[error("Not the owner of {0}")]
    OwnershipDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Credential store error: {0}")]
    Password(#[from] PasswordError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingToken
            | AppError::MalformedToken
            | AppError::Unauthenticated
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Token(TokenError::Signing) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenRole(_) | AppError::OwnershipDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Config(_)
            | AppError::Password(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 稳定的错误类别标识
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingToken => "missing_token",
            AppError::MalformedToken | AppError::Token(TokenError::InvalidFormat) => {
                "malformed_token"
            }
            AppError::Token(TokenError::Signing) => "internal_error",
            AppError::Token(_) => "invalid_token",
            AppError::Unauthenticated => "unauthenticated",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::ForbiddenRole(_) => "forbidden_role",
            AppError::OwnershipDenied(_) => "ownership_denied",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::Database(_)
            | AppError::Config(_)
            | AppError::Password(_)
            | AppError::Internal(_) => "internal_error",
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingToken => "Token required".to_string(),
            AppError::MalformedToken | AppError::Token(TokenError::InvalidFormat) => {
                "Invalid token format".to_string()
            }
            // 过期、签名错误、解析失败对外统一
            AppError::Token(TokenError::Expired)
            | AppError::Token(TokenError::InvalidSignature)
            | AppError::Token(TokenError::Malformed) => "Invalid or expired token".to_string(),
            AppError::Token(TokenError::Signing) => "Internal server error".to_string(),
            AppError::Unauthenticated => "Authentication required".to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::ForbiddenRole(msg) => msg.clone(),
            AppError::OwnershipDenied(what) => {
                format!("You are not allowed to modify this {}", what)
            }
            AppError::NotFound(what) => format!("Resource not found: {}", what),
            AppError::Conflict(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Password(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    // 便捷方法
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(what.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        AppError::Validation(msg.to_string())
    }

    pub fn conflict(msg: &str) -> Self {
        AppError::Conflict(msg.to_string())
    }

    pub fn internal_error(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

/// 错误响应 DTO
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub kind: &'static str,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // 与响应头 x-request-id 保持一致；追踪中间件之外才生成新的
        let request_id = crate::middleware::current_request_id()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                kind: self.kind(),
                message: self.user_message(),
                request_id,
            },
        };

        // 记录错误日志：5xx 为 error，认证/授权失败为 warn，其余 debug
        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                kind = self.kind(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Application error"
            );
        } else if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::warn!(
                code = self.code(),
                kind = self.kind(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Request rejected"
            );
        } else {
            tracing::debug!(
                code = self.code(),
                kind = self.kind(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Request failed"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// 请求体解析失败，只返回安全的概括信息
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");

        match rejection {
            JsonRejection::JsonDataError(_) => {
                AppError::validation("Request body has missing or invalid fields")
            }
            JsonRejection::MissingJsonContentType(_) => {
                AppError::BadRequest("Expected Content-Type: application/json".to_string())
            }
            JsonRejection::JsonSyntaxError(_) => {
                AppError::BadRequest("Request body is not valid JSON".to_string())
            }
            _ => AppError::BadRequest("Failed to read request body".to_string()),
        }
    }
}

/// 从 validator::ValidationErrors 转换，优先使用字段上声明的 message
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort_unstable();
        AppError::Validation(messages.join(", "))
    }
}
