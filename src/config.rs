//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息
//!
//! 配置只在进程启动时构建一次，然后通过构造函数传递给各个组件。

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// JWT 密钥最小长度（HS256）
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    pub fn is_development(&self) -> bool {
        matches!(self, AppEnvironment::Development)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// 运行环境: development, production
    pub environment: AppEnvironment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:8080"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
    /// 生产环境允许的 CORS 来源
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接 URL（使用 Secret 包装，防止日志泄露）
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
    /// 空闲连接超时时间（秒）
    pub idle_timeout_secs: u64,
    /// 连接最大生命周期（秒）
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// JWT 签名密钥（使用 Secret 包装，防止日志泄露）
    /// 仅在 development 环境下允许缺省
    #[serde(default)]
    pub jwt_secret: Option<Secret<String>>,
    /// 刷新令牌过期时间（秒）
    pub refresh_token_exp_secs: u64,
    /// 注册时密码最小长度
    pub password_min_length: usize,
    /// 是否允许匿名注册管理员（仅用于初始化）
    pub admin_registration_open: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("app.environment", "production")?
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.refresh_token_exp_secs", 604800)?
            .set_default("security.password_min_length", 8)?
            .set_default("security.admin_registration_open", false)?;

        // 从环境变量加载配置（前缀为 LALAN_）
        settings = settings.add_source(
            Environment::with_prefix("LALAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 兼容部署中常见的裸变量名
        settings = settings
            .set_override_option("security.jwt_secret", non_empty_env("JWT_SECRET"))?
            .set_override_option("app.environment", non_empty_env("APP_ENV").map(normalize_env))?;

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证数据库连接池配置
        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        // 验证 JWT 密钥：生产环境必须显式配置
        match &self.security.jwt_secret {
            Some(secret) if secret.expose_secret().len() < MIN_JWT_SECRET_LEN => {
                return Err(ConfigError::Message(format!(
                    "JWT secret must be at least {} characters long",
                    MIN_JWT_SECRET_LEN
                )));
            }
            Some(_) => {}
            None if self.app.environment.is_development() => {}
            None => {
                return Err(ConfigError::Message(
                    "JWT secret is required outside development (set JWT_SECRET)".to_string(),
                ));
            }
        }

        if self.security.refresh_token_exp_secs < 3600
            || self.security.refresh_token_exp_secs > 2592000
        {
            return Err(ConfigError::Message(
                "refresh_token_exp_secs must be between 3600 and 2592000 (1 hour to 30 days)"
                    .to_string(),
            ));
        }

        // 验证密码策略
        if self.security.password_min_length < 6 || self.security.password_min_length > 128 {
            return Err(ConfigError::Message(
                "password_min_length must be between 6 and 128".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// APP_ENV 历史上使用 dev/prod 缩写
fn normalize_env(value: String) -> String {
    match value.to_lowercase().as_str() {
        "dev" | "development" | "local" => "development".to_string(),
        "prod" | "production" => "production".to_string(),
        other => other.to_string(),
    }
}
