//! 条款服务：每个 hoster 最多一份

use crate::{
    auth::{middleware::Identity, ownership::fetch_owned},
    error::AppError,
    models::terms::{TermsAndConditions, TermsRequest},
    repository::TermsRepository,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct TermsService {
    terms: Arc<dyn TermsRepository>,
}

impl TermsService {
    pub fn new(terms: Arc<dyn TermsRepository>) -> Self {
        Self { terms }
    }

    fn description(req: &TermsRequest) -> Result<Vec<String>, AppError> {
        let lines = req.cleaned();
        if lines.is_empty() {
            return Err(AppError::validation("Description is required"));
        }
        Ok(lines)
    }

    pub async fn create(
        &self,
        identity: &Identity,
        req: TermsRequest,
    ) -> Result<TermsAndConditions, AppError> {
        let description = Self::description(&req)?;

        if !self.terms.list_by_owner(&identity.user_id).await?.is_empty() {
            return Err(AppError::conflict(
                "Terms and conditions already exist for this hoster",
            ));
        }

        let now = Utc::now();
        let terms = TermsAndConditions {
            id: Uuid::new_v4().to_string(),
            description,
            user_id: identity.user_id.clone(),
            created_at: now,
            updated_at: now,
        };

        self.terms.create(&terms).await?;

        tracing::info!(terms_id = %terms.id, user_id = %terms.user_id, "Terms created");

        Ok(terms)
    }

    pub async fn list_own(&self, identity: &Identity) -> Result<Vec<TermsAndConditions>, AppError> {
        self.terms.list_by_owner(&identity.user_id).await
    }

    pub async fn get_own(
        &self,
        identity: &Identity,
        id: &str,
    ) -> Result<TermsAndConditions, AppError> {
        fetch_owned(identity, "terms", || self.terms.find_by_id(id)).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        req: TermsRequest,
    ) -> Result<TermsAndConditions, AppError> {
        let mut terms = fetch_owned(identity, "terms", || self.terms.find_by_id(id)).await?;
        terms.description = Self::description(&req)?;
        terms.updated_at = Utc::now();

        if !self.terms.update(&terms).await? {
            return Err(AppError::not_found("terms"));
        }

        tracing::info!(terms_id = %terms.id, user_id = %identity.user_id, "Terms updated");

        Ok(terms)
    }

    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<(), AppError> {
        fetch_owned(identity, "terms", || self.terms.find_by_id(id)).await?;

        if !self.terms.delete(id).await? {
            return Err(AppError::not_found("terms"));
        }

        tracing::info!(terms_id = %id, user_id = %identity.user_id, "Terms deleted");

        Ok(())
    }
}
