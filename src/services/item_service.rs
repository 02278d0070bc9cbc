//! 物品服务：hoster 只能修改自己的物品

use crate::{
    auth::{middleware::Identity, ownership::fetch_owned},
    error::AppError,
    models::{
        item::{Item, ItemRequest},
        trimmed, trimmed_opt,
    },
    repository::{CategoryRepository, ItemRepository},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    categories: Arc<dyn CategoryRepository>,
}

/// Validated item fields, owner excluded
struct ItemFields {
    name: String,
    description: Option<String>,
    photos: Vec<String>,
    category_id: String,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { items, categories }
    }

    async fn validate(
        &self,
        owner: &str,
        req: &ItemRequest,
        current_id: Option<&str>,
    ) -> Result<ItemFields, AppError> {
        let name = trimmed(&req.name).ok_or_else(|| AppError::validation("Item name is required"))?;
        let category_id = trimmed(&req.category_id)
            .ok_or_else(|| AppError::validation("Category is required"))?;

        if req.stock < 0 {
            return Err(AppError::validation("Stock cannot be negative"));
        }
        if req.price_per_day < 0 || req.deposit < 0 || req.discount < 0 {
            return Err(AppError::validation(
                "Price, deposit and discount cannot be negative",
            ));
        }

        if self.categories.find_by_id(&category_id).await?.is_none() {
            return Err(AppError::validation("Category does not exist"));
        }

        if self.items.name_taken(owner, &name, current_id).await? {
            return Err(AppError::conflict("Item name already exists"));
        }

        Ok(ItemFields {
            name,
            description: trimmed_opt(req.description.clone()),
            photos: req.photos.iter().filter_map(|p| trimmed(p)).collect(),
            category_id,
        })
    }

    /// 创建物品，所有者取自令牌
    pub async fn create(&self, identity: &Identity, req: ItemRequest) -> Result<Item, AppError> {
        let fields = self.validate(&identity.user_id, &req, None).await?;

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            description: fields.description,
            photos: fields.photos,
            stock: req.stock,
            pickup_type: req.pickup_type,
            price_per_day: req.price_per_day,
            deposit: req.deposit,
            discount: req.discount,
            category_id: fields.category_id,
            user_id: identity.user_id.clone(),
            created_at: now,
            updated_at: now,
        };

        self.items.create(&item).await?;

        tracing::info!(item_id = %item.id, user_id = %item.user_id, "Item created");

        Ok(item)
    }

    pub async fn list_own(&self, identity: &Identity) -> Result<Vec<Item>, AppError> {
        self.items.list_by_owner(&identity.user_id).await
    }

    /// 所有者视角读取单个物品
    pub async fn get_own(&self, identity: &Identity, id: &str) -> Result<Item, AppError> {
        fetch_owned(identity, "item", || self.items.find_by_id(id)).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        req: ItemRequest,
    ) -> Result<Item, AppError> {
        let mut item = fetch_owned(identity, "item", || self.items.find_by_id(id)).await?;
        let fields = self.validate(&identity.user_id, &req, Some(id)).await?;

        item.name = fields.name;
        item.description = fields.description;
        item.photos = fields.photos;
        item.stock = req.stock;
        item.pickup_type = req.pickup_type;
        item.price_per_day = req.price_per_day;
        item.deposit = req.deposit;
        item.discount = req.discount;
        item.category_id = fields.category_id;
        item.updated_at = Utc::now();

        if !self.items.update(&item).await? {
            return Err(AppError::not_found("item"));
        }

        tracing::info!(item_id = %item.id, user_id = %identity.user_id, "Item updated");

        Ok(item)
    }

    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<(), AppError> {
        fetch_owned(identity, "item", || self.items.find_by_id(id)).await?;

        if !self.items.delete(id).await? {
            return Err(AppError::not_found("item"));
        }

        tracing::info!(item_id = %id, user_id = %identity.user_id, "Item deleted");

        Ok(())
    }
}
