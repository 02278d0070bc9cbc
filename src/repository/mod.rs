//! Database repository layer
//!
//! Services depend on these traits; the PostgreSQL implementations live in
//! the submodules.

pub mod account_repo;
pub mod category_repo;
pub mod item_repo;
pub mod terms_repo;

pub use account_repo::PgAccountRepository;
pub use category_repo::PgCategoryRepository;
pub use item_repo::PgItemRepository;
pub use terms_repo::PgTermsRepository;

use crate::{
    auth::role::Role,
    error::AppError,
    models::{
        account::{Admin, CredentialRecord, Customer, Hoster},
        category::Category,
        item::Item,
        terms::TermsAndConditions,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Account storage for the three account types
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Look up the login record for an e-mail within one account type
    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<CredentialRecord>, AppError>;

    async fn exists(&self, role: Role, id: &str) -> Result<bool, AppError>;

    /// Fails with `Conflict` when the e-mail is taken
    async fn create_admin(&self, admin: &Admin) -> Result<(), AppError>;
    async fn create_hoster(&self, hoster: &Hoster) -> Result<(), AppError>;
    async fn create_customer(&self, customer: &Customer) -> Result<(), AppError>;

    async fn find_hoster(&self, id: &str) -> Result<Option<Hoster>, AppError>;
    async fn find_customer(&self, id: &str) -> Result<Option<Customer>, AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;
    async fn create(&self, category: &Category) -> Result<(), AppError>;
    async fn update(&self, category: &Category) -> Result<bool, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Item>, AppError>;
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Item>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, AppError>;
    /// Whether the owner already has another item with this name
    async fn name_taken(
        &self,
        user_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, AppError>;
    async fn create(&self, item: &Item) -> Result<(), AppError>;
    async fn update(&self, item: &Item) -> Result<bool, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TermsRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<TermsAndConditions>, AppError>;
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<TermsAndConditions>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<TermsAndConditions>, AppError>;
    async fn create(&self, terms: &TermsAndConditions) -> Result<(), AppError>;
    async fn update(&self, terms: &TermsAndConditions) -> Result<bool, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// Map a unique-constraint violation to `Conflict`; other errors stay database errors
pub(crate) fn map_unique_violation(e: sqlx::Error, conflict_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            tracing::debug!(
                constraint = db_err.constraint().unwrap_or("unknown"),
                "Unique constraint violation"
            );
            return AppError::Conflict(conflict_message.to_string());
        }
    }
    AppError::Database(e)
}

/// Map a foreign-key violation to `Conflict`
pub(crate) fn map_foreign_key_violation(e: sqlx::Error, conflict_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict(conflict_message.to_string());
        }
    }
    AppError::Database(e)
}

/// Repository handles shared by the services
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub terms: Arc<dyn TermsRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: &sqlx::PgPool) -> Self {
        Self {
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            items: Arc::new(PgItemRepository::new(pool.clone())),
            terms: Arc::new(PgTermsRepository::new(pool.clone())),
        }
    }
}
