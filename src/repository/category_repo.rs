//! Category repository

use super::{map_foreign_key_violation, map_unique_violation, CategoryRepository};
use crate::{error::AppError, models::category::Category};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgCategoryRepository {
    db: PgPool,
}

impl PgCategoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(&self.db)
                .await?;

        Ok(categories)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(category)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE LOWER(name) = LOWER($1)")
                .bind(name)
                .fetch_optional(&self.db)
                .await?;

        Ok(category)
    }

    async fn create(&self, category: &Category) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Category name already exists"))?;

        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE categories SET name = $2, description = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Category name already exists"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| map_foreign_key_violation(e, "Category is still used by items"))?;

        Ok(result.rows_affected() > 0)
    }
}
