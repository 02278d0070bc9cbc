//! 分类管理服务（仅管理员）

use crate::{
    error::AppError,
    models::{
        category::{Category, CategoryRequest},
        trimmed, trimmed_opt,
    },
    repository::CategoryRepository,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// 名称必填，且不能与其他分类重复
    async fn check_name(&self, name: &str, current_id: Option<&str>) -> Result<String, AppError> {
        let name = trimmed(name).ok_or_else(|| AppError::validation("Category name is required"))?;

        if let Some(existing) = self.categories.find_by_name(&name).await? {
            if Some(existing.id.as_str()) != current_id {
                return Err(AppError::conflict("Category name already exists"));
            }
        }

        Ok(name)
    }

    pub async fn create(&self, req: CategoryRequest) -> Result<Category, AppError> {
        let name = self.check_name(&req.name, None).await?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
            description: trimmed_opt(req.description),
            created_at: now,
            updated_at: now,
        };

        self.categories.create(&category).await?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");

        Ok(category)
    }

    pub async fn get(&self, id: &str) -> Result<Category, AppError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("category"))
    }

    pub async fn update(&self, id: &str, req: CategoryRequest) -> Result<Category, AppError> {
        let mut category = self.get(id).await?;
        category.name = self.check_name(&req.name, Some(id)).await?;
        category.description = trimmed_opt(req.description);
        category.updated_at = Utc::now();

        if !self.categories.update(&category).await? {
            return Err(AppError::not_found("category"));
        }

        tracing::info!(category_id = %category.id, "Category updated");

        Ok(category)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.get(id).await?;

        if !self.categories.delete(id).await? {
            return Err(AppError::not_found("category"));
        }

        tracing::info!(category_id = %id, "Category deleted");

        Ok(())
    }
}
