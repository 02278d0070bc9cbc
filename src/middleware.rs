//! HTTP 中间件与应用状态
//! 请求追踪（trace_id / request_id / 指标）

use crate::{
    auth::{jwt::TokenService, password::PasswordHasher},
    config::AppConfig,
    repository::Repositories,
    services::{AuthService, CatalogService, CategoryService, ItemService, TermsService},
};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 配置与签名密钥在启动时构建一次，之后只读共享。
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// 测试中使用内存仓库时为 None
    pub db: Option<sqlx::PgPool>,
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub category_service: Arc<CategoryService>,
    pub item_service: Arc<ItemService>,
    pub terms_service: Arc<TermsService>,
    pub catalog_service: Arc<CatalogService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Option<sqlx::PgPool>,
        tokens: Arc<TokenService>,
        repos: Repositories,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            repos.accounts.clone(),
            tokens.clone(),
            PasswordHasher::new(),
            &config,
        ));
        let category_service = Arc::new(CategoryService::new(repos.categories.clone()));
        let item_service = Arc::new(ItemService::new(
            repos.items.clone(),
            repos.categories.clone(),
        ));
        let terms_service = Arc::new(TermsService::new(repos.terms.clone()));
        let catalog_service = Arc::new(CatalogService::new(
            repos.categories,
            repos.items,
            repos.terms,
        ));

        Self {
            config: Arc::new(config),
            db,
            tokens,
            auth_service,
            category_service,
            item_service,
            terms_service,
            catalog_service,
        }
    }
}

tokio::task_local! {
    /// 当前请求的 request_id，错误响应体与响应头共用
    static REQUEST_ID: String;
}

/// 读取当前请求的 request_id，在请求追踪中间件之外为 None
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    // 生成或提取 trace_id/request_id
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    // 创建 span（不记录 query，避免泄露参数）
    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();

        let mut response = REQUEST_ID.scope(request_id.clone(), next.run(req)).await;

        let elapsed = start.elapsed();

        // 记录指标 - 使用静态字符串
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            409 => "409",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            path = %path,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        // 在响应头中回显 trace_id / request_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_or_generate_trace_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "test-trace-123".parse().unwrap());

        let trace_id = extract_or_generate_trace_id(&headers);
        assert_eq!(trace_id, "test-trace-123");

        let headers = HeaderMap::new();
        let trace_id = extract_or_generate_trace_id(&headers);
        assert!(!trace_id.is_empty());
        assert_ne!(trace_id, "test-trace-123");
    }

    #[tokio::test]
    async fn test_request_id_visible_only_inside_scope() {
        assert!(current_request_id().is_none());

        let seen = REQUEST_ID
            .scope("req-1".to_string(), async { current_request_id() })
            .await;
        assert_eq!(seen.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_oversized_trace_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "a".repeat(300).parse().unwrap());
        assert_eq!(extract_or_generate_trace_id(&headers).len(), 36);
    }
}
