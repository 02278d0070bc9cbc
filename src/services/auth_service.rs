//! 账户服务：注册、登录、令牌刷新、个人资料

use crate::{
    auth::{
        jwt::{TokenError, TokenResponse, TokenService},
        middleware::Identity,
        password::PasswordHasher,
        role::Role,
    },
    config::AppConfig,
    error::AppError,
    models::{
        account::*,
        auth::{MeResponse, RefreshTokenRequest},
        trimmed_opt,
    },
    repository::AccountRepository,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    password_min_length: usize,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        config: &AppConfig,
    ) -> Self {
        Self {
            accounts,
            tokens,
            hasher,
            password_min_length: config.security.password_min_length,
        }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// 检查密码策略
    fn check_password_policy(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.password_min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }
        Ok(())
    }

    /// 注册管理员
    pub async fn register_admin(
        &self,
        mut req: RegisterAdminRequest,
    ) -> Result<TokenResponse, AppError> {
        req.full_name = req.full_name.trim().to_string();
        req.email = Self::normalize_email(&req.email);
        req.validate()?;
        self.check_password_policy(&req.password)?;

        let now = Utc::now();
        let admin = Admin {
            id: Uuid::new_v4().to_string(),
            full_name: req.full_name,
            email: req.email,
            password_hash: self.hasher.hash(&req.password)?,
            created_at: now,
            updated_at: now,
        };

        self.accounts.create_admin(&admin).await?;

        tracing::info!(user_id = %admin.id, role = %Role::Admin, "Account registered");

        Ok(self.tokens.issue(&admin.id, Role::Admin)?)
    }

    /// 注册 hoster
    pub async fn register_hoster(
        &self,
        mut req: RegisterHosterRequest,
    ) -> Result<TokenResponse, AppError> {
        req.full_name = req.full_name.trim().to_string();
        req.store_name = req.store_name.trim().to_string();
        req.email = Self::normalize_email(&req.email);
        req.website = trimmed_opt(req.website);
        req.validate()?;
        self.check_password_policy(&req.password)?;

        let now = Utc::now();
        let hoster = Hoster {
            id: Uuid::new_v4().to_string(),
            full_name: req.full_name,
            profile_photo: trimmed_opt(req.profile_photo),
            store_name: req.store_name,
            description: trimmed_opt(req.description),
            website: req.website,
            instagram: trimmed_opt(req.instagram),
            tiktok: trimmed_opt(req.tiktok),
            phone_number: trimmed_opt(req.phone_number),
            email: req.email,
            address: trimmed_opt(req.address),
            password_hash: self.hasher.hash(&req.password)?,
            created_at: now,
            updated_at: now,
        };

        self.accounts.create_hoster(&hoster).await?;

        tracing::info!(user_id = %hoster.id, role = %Role::Hoster, "Account registered");

        Ok(self.tokens.issue(&hoster.id, Role::Hoster)?)
    }

    /// 注册 customer
    pub async fn register_customer(
        &self,
        mut req: RegisterCustomerRequest,
    ) -> Result<TokenResponse, AppError> {
        req.full_name = req.full_name.trim().to_string();
        req.email = Self::normalize_email(&req.email);
        req.validate()?;
        self.check_password_policy(&req.password)?;

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            full_name: req.full_name,
            profile_photo: trimmed_opt(req.profile_photo),
            phone_number: trimmed_opt(req.phone_number),
            email: req.email,
            address: trimmed_opt(req.address),
            password_hash: self.hasher.hash(&req.password)?,
            created_at: now,
            updated_at: now,
        };

        self.accounts.create_customer(&customer).await?;

        tracing::info!(user_id = %customer.id, role = %Role::Customer, "Account registered");

        Ok(self.tokens.issue(&customer.id, Role::Customer)?)
    }

    /// 登录：未知邮箱与错误密码返回同一个错误
    pub async fn login(&self, role: Role, req: LoginRequest) -> Result<TokenResponse, AppError> {
        let email = Self::normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let Some(record) = self.accounts.find_credentials(role, &email).await? else {
            self.hasher.verify_absent(&req.password);
            tracing::debug!(role = %role, "Login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(&record.password_hash, &req.password)? {
            tracing::warn!(user_id = %record.id, role = %role, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %record.id, role = %role, "User logged in");

        Ok(self.tokens.issue(&record.id, role)?)
    }

    /// 刷新令牌：校验刷新令牌并轮换出新的一对
    pub async fn refresh(&self, req: RefreshTokenRequest) -> Result<TokenResponse, AppError> {
        let claims = self.tokens.verify_refresh(req.refresh_token.trim())?;

        if !self.accounts.exists(claims.role, &claims.sub).await? {
            tracing::warn!(
                user_id = %claims.sub,
                role = %claims.role,
                "Refresh token subject no longer exists"
            );
            return Err(AppError::Token(TokenError::Malformed));
        }

        tracing::debug!(user_id = %claims.sub, role = %claims.role, "Token refreshed");

        Ok(self.tokens.issue(&claims.sub, claims.role)?)
    }

    pub fn me(&self, identity: &Identity) -> MeResponse {
        MeResponse {
            id: identity.user_id.clone(),
            role: identity.role,
        }
    }

    /// hoster 详情（不含密码哈希）
    pub async fn hoster_detail(&self, identity: &Identity) -> Result<Hoster, AppError> {
        self.accounts
            .find_hoster(&identity.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("hoster"))
    }

    pub async fn customer_profile(&self, identity: &Identity) -> Result<Customer, AppError> {
        self.accounts
            .find_customer(&identity.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("customer"))
    }
}
