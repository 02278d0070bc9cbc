//! Account repository (数据库访问层)

use super::{map_unique_violation, AccountRepository};
use crate::{
    auth::role::Role,
    error::AppError,
    models::account::{Admin, CredentialRecord, Customer, Hoster},
};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgAccountRepository {
    db: PgPool,
}

impl PgAccountRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn table(role: Role) -> &'static str {
        match role {
            Role::Admin => "admins",
            Role::Hoster => "hosters",
            Role::Customer => "customers",
        }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    /// 根据邮箱查找登录凭据
    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<CredentialRecord>, AppError> {
        let sql = format!(
            "SELECT id, password_hash FROM {} WHERE email = $1",
            Self::table(role)
        );

        let record = sqlx::query_as::<_, CredentialRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(record)
    }

    async fn exists(&self, role: Role, id: &str) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            Self::table(role)
        );

        let exists: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;

        Ok(exists)
    }

    /// 创建管理员
    async fn create_admin(&self, admin: &Admin) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, full_name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&admin.id)
        .bind(&admin.full_name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Admin email already registered"))?;

        Ok(())
    }

    /// 创建 hoster
    async fn create_hoster(&self, hoster: &Hoster) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO hosters (
                id, full_name, profile_photo, store_name, description, website, instagram,
                tiktok, phone_number, email, address, password_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(&hoster.id)
        .bind(&hoster.full_name)
        .bind(&hoster.profile_photo)
        .bind(&hoster.store_name)
        .bind(&hoster.description)
        .bind(&hoster.website)
        .bind(&hoster.instagram)
        .bind(&hoster.tiktok)
        .bind(&hoster.phone_number)
        .bind(&hoster.email)
        .bind(&hoster.address)
        .bind(&hoster.password_hash)
        .bind(hoster.created_at)
        .bind(hoster.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Hoster email already registered"))?;

        Ok(())
    }

    /// 创建 customer
    async fn create_customer(&self, customer: &Customer) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, full_name, profile_photo, phone_number, email, address,
                password_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.full_name)
        .bind(&customer.profile_photo)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.password_hash)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Customer email already registered"))?;

        Ok(())
    }

    async fn find_hoster(&self, id: &str) -> Result<Option<Hoster>, AppError> {
        let hoster = sqlx::query_as::<_, Hoster>("SELECT * FROM hosters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(hoster)
    }

    async fn find_customer(&self, id: &str) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(customer)
    }
}
