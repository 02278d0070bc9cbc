//! Business logic services layer

pub mod auth_service;
pub mod catalog_service;
pub mod category_service;
pub mod item_service;
pub mod terms_service;

pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use category_service::CategoryService;
pub use item_service::ItemService;
pub use terms_service::TermsService;
