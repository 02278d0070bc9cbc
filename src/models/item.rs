//! Rental item models

use crate::auth::ownership::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the renter receives the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupType {
    Pickup,
    Delivery,
}

impl PickupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupType::Pickup => "pickup",
            PickupType::Delivery => "delivery",
        }
    }
}

impl fmt::Display for PickupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown pickup type: {0}")]
pub struct UnknownPickupType(String);

impl TryFrom<String> for PickupType {
    type Error = UnknownPickupType;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "pickup" => Ok(PickupType::Pickup),
            "delivery" => Ok(PickupType::Delivery),
            _ => Err(UnknownPickupType(s)),
        }
    }
}

/// Item offered for rent by a hoster
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub photos: Vec<String>,
    pub stock: i32,
    #[sqlx(try_from = "String")]
    pub pickup_type: PickupType,
    pub price_per_day: i64,
    pub deposit: i64,
    pub discount: i64,
    pub category_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Item {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Create or replace an item. The owner always comes from the token.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub stock: i32,
    pub pickup_type: PickupType,
    pub price_per_day: i64,
    pub deposit: i64,
    #[serde(default)]
    pub discount: i64,
    pub category_id: String,
}
