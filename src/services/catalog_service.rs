//! 公开目录（只读，无需认证）

use crate::{
    error::AppError,
    models::{category::Category, item::Item, terms::TermsAndConditions},
    repository::{CategoryRepository, ItemRepository, TermsRepository},
};
use std::sync::Arc;

pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn ItemRepository>,
    terms: Arc<dyn TermsRepository>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        items: Arc<dyn ItemRepository>,
        terms: Arc<dyn TermsRepository>,
    ) -> Self {
        Self {
            categories,
            items,
            terms,
        }
    }

    pub async fn categories(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }

    pub async fn items(&self) -> Result<Vec<Item>, AppError> {
        self.items.list().await
    }

    pub async fn item(&self, id: &str) -> Result<Item, AppError> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("item"))
    }

    pub async fn terms(&self) -> Result<Vec<TermsAndConditions>, AppError> {
        self.terms.list().await
    }
}
