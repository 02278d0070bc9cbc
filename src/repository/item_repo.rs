//! Item repository

use super::{map_unique_violation, ItemRepository};
use crate::{error::AppError, models::item::Item};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgItemRepository {
    db: PgPool,
}

impl PgItemRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn list(&self) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;

        Ok(items)
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(item)
    }

    async fn name_taken(
        &self,
        user_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM items
                WHERE user_id = $1 AND LOWER(name) = LOWER($2)
                    AND ($3::TEXT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;

        Ok(taken)
    }

    async fn create(&self, item: &Item) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, description, photos, stock, pickup_type, price_per_day,
                deposit, discount, category_id, user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.photos)
        .bind(item.stock)
        .bind(item.pickup_type.as_str())
        .bind(item.price_per_day)
        .bind(item.deposit)
        .bind(item.discount)
        .bind(&item.category_id)
        .bind(&item.user_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Item name already exists"))?;

        Ok(())
    }

    /// 更新物品；user_id 不在更新列中
    async fn update(&self, item: &Item) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = $2, description = $3, photos = $4, stock = $5, pickup_type = $6,
                price_per_day = $7, deposit = $8, discount = $9, category_id = $10,
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.photos)
        .bind(item.stock)
        .bind(item.pickup_type.as_str())
        .bind(item.price_per_day)
        .bind(item.deposit)
        .bind(item.discount)
        .bind(&item.category_id)
        .bind(item.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Item name already exists"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
