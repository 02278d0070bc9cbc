//! Terms and conditions published by a hoster

use crate::auth::ownership::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TermsAndConditions {
    pub id: String,
    pub description: Vec<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for TermsAndConditions {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TermsRequest {
    pub description: Vec<String>,
}

impl TermsRequest {
    /// Lines with surrounding whitespace removed, blank lines dropped
    pub fn cleaned(&self) -> Vec<String> {
        self.description
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}
