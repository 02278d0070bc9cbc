//! Terms and conditions repository

use super::{map_unique_violation, TermsRepository};
use crate::{error::AppError, models::terms::TermsAndConditions};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgTermsRepository {
    db: PgPool,
}

impl PgTermsRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TermsRepository for PgTermsRepository {
    async fn list(&self) -> Result<Vec<TermsAndConditions>, AppError> {
        let terms = sqlx::query_as::<_, TermsAndConditions>(
            "SELECT * FROM terms_and_conditions ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(terms)
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<TermsAndConditions>, AppError> {
        let terms = sqlx::query_as::<_, TermsAndConditions>(
            "SELECT * FROM terms_and_conditions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(terms)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TermsAndConditions>, AppError> {
        let terms = sqlx::query_as::<_, TermsAndConditions>(
            "SELECT * FROM terms_and_conditions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(terms)
    }

    /// 每个 hoster 只能有一份（user_id 唯一约束）
    async fn create(&self, terms: &TermsAndConditions) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO terms_and_conditions (id, description, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&terms.id)
        .bind(&terms.description)
        .bind(&terms.user_id)
        .bind(terms.created_at)
        .bind(terms.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Terms and conditions already exist for this hoster"))?;

        Ok(())
    }

    async fn update(&self, terms: &TermsAndConditions) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE terms_and_conditions SET description = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(&terms.id)
        .bind(&terms.description)
        .bind(terms.updated_at)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM terms_and_conditions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
