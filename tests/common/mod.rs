//! 测试公共模块
//! 内存仓库 + 测试配置，不依赖数据库即可驱动完整的 HTTP 栈；
//! 仓库测试另用 setup_test_db 连接真实数据库

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use lalan_service::{
    auth::{jwt::TokenService, password::PasswordHasher, role::Role},
    config::{
        AppConfig, AppEnvironment, AppSettings, DatabaseConfig, LoggingConfig, SecurityConfig,
        ServerConfig,
    },
    db,
    error::AppError,
    middleware::AppState,
    models::{
        account::{Admin, CredentialRecord, Customer, Hoster},
        category::Category,
        item::{Item, PickupType},
        terms::TermsAndConditions,
    },
    repository::{
        AccountRepository, CategoryRepository, ItemRepository, Repositories, TermsRepository,
    },
    routes,
};
use secrecy::Secret;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            environment: AppEnvironment::Development,
        },
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
            cors_allowed_origin: None,
        },
        database: DatabaseConfig {
            url: Secret::new("postgresql://unused@localhost/unused".to_string()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Some(Secret::new(TEST_SECRET.to_string())),
            refresh_token_exp_secs: 3600,
            password_min_length: 8,
            admin_registration_open: false,
        },
    }
}

/// 连接测试数据库并清空数据
///
/// 未设置 LALAN_TEST_DATABASE_URL 时返回 None，数据库测试直接跳过。
pub async fn setup_test_db() -> Option<PgPool> {
    let url = std::env::var("LALAN_TEST_DATABASE_URL").ok()?;

    let mut config = create_test_config();
    config.database.url = Secret::new(url);

    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query(
        "TRUNCATE TABLE terms_and_conditions, items, categories, customers, hosters, admins CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to clean test tables");

    Some(pool)
}

pub fn hoster_fixture(id: &str, email: &str) -> Hoster {
    let now = Utc::now();
    Hoster {
        id: id.to_string(),
        full_name: format!("Hoster {}", id),
        profile_photo: None,
        store_name: format!("Store {}", id),
        description: None,
        website: None,
        instagram: None,
        tiktok: None,
        phone_number: None,
        email: email.to_string(),
        address: None,
        password_hash: "$argon2id$fixture".to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn category_fixture(id: &str, name: &str) -> Category {
    let now = Utc::now();
    Category {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn item_fixture(id: &str, owner: &str, category_id: &str) -> Item {
    let now = Utc::now();
    Item {
        id: id.to_string(),
        name: format!("Item {}", id),
        description: None,
        photos: vec![],
        stock: 1,
        pickup_type: PickupType::Pickup,
        price_per_day: 100,
        deposit: 50,
        discount: 0,
        category_id: category_id.to_string(),
        user_id: owner.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn terms_fixture(id: &str, owner: &str) -> TermsAndConditions {
    let now = Utc::now();
    TermsAndConditions {
        id: id.to_string(),
        description: vec!["No smoking".to_string()],
        user_id: owner.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// 内存存储，模拟数据库的唯一约束
#[derive(Default)]
pub struct MemoryStore {
    pub admins: Mutex<Vec<Admin>>,
    pub hosters: Mutex<Vec<Hoster>>,
    pub customers: Mutex<Vec<Customer>>,
    pub categories: Mutex<Vec<Category>>,
    pub items: Mutex<Vec<Item>>,
    pub terms: Mutex<Vec<TermsAndConditions>>,
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<CredentialRecord>, AppError> {
        let record = match role {
            Role::Admin => self.admins.lock().unwrap().iter().find(|a| a.email == email).map(
                |a| CredentialRecord {
                    id: a.id.clone(),
                    password_hash: a.password_hash.clone(),
                },
            ),
            Role::Hoster => self.hosters.lock().unwrap().iter().find(|h| h.email == email).map(
                |h| CredentialRecord {
                    id: h.id.clone(),
                    password_hash: h.password_hash.clone(),
                },
            ),
            Role::Customer => self
                .customers
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.email == email)
                .map(|c| CredentialRecord {
                    id: c.id.clone(),
                    password_hash: c.password_hash.clone(),
                }),
        };
        Ok(record)
    }

    async fn exists(&self, role: Role, id: &str) -> Result<bool, AppError> {
        Ok(match role {
            Role::Admin => self.admins.lock().unwrap().iter().any(|a| a.id == id),
            Role::Hoster => self.hosters.lock().unwrap().iter().any(|h| h.id == id),
            Role::Customer => self.customers.lock().unwrap().iter().any(|c| c.id == id),
        })
    }

    async fn create_admin(&self, admin: &Admin) -> Result<(), AppError> {
        let mut admins = self.admins.lock().unwrap();
        if admins.iter().any(|a| a.email == admin.email) {
            return Err(AppError::conflict("Admin email already registered"));
        }
        admins.push(admin.clone());
        Ok(())
    }

    async fn create_hoster(&self, hoster: &Hoster) -> Result<(), AppError> {
        let mut hosters = self.hosters.lock().unwrap();
        if hosters.iter().any(|h| h.email == hoster.email) {
            return Err(AppError::conflict("Hoster email already registered"));
        }
        hosters.push(hoster.clone());
        Ok(())
    }

    async fn create_customer(&self, customer: &Customer) -> Result<(), AppError> {
        let mut customers = self.customers.lock().unwrap();
        if customers.iter().any(|c| c.email == customer.email) {
            return Err(AppError::conflict("Customer email already registered"));
        }
        customers.push(customer.clone());
        Ok(())
    }

    async fn find_hoster(&self, id: &str) -> Result<Option<Hoster>, AppError> {
        Ok(self.hosters.lock().unwrap().iter().find(|h| h.id == id).cloned())
    }

    async fn find_customer(&self, id: &str) -> Result<Option<Customer>, AppError> {
        Ok(self.customers.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError> {
        Ok(self.categories.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn create(&self, category: &Category) -> Result<(), AppError> {
        self.categories.lock().unwrap().push(category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool, AppError> {
        let mut categories = self.categories.lock().unwrap();
        match categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => {
                *existing = category.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        if self.items.lock().unwrap().iter().any(|i| i.category_id == id) {
            return Err(AppError::conflict("Category is still used by items"));
        }
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() < before)
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Item>, AppError> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Item>, AppError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, AppError> {
        Ok(self.items.lock().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn name_taken(
        &self,
        user_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, AppError> {
        Ok(self.items.lock().unwrap().iter().any(|i| {
            i.user_id == user_id
                && i.name.eq_ignore_ascii_case(name)
                && Some(i.id.as_str()) != exclude_id
        }))
    }

    async fn create(&self, item: &Item) -> Result<(), AppError> {
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<bool, AppError> {
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                // 所有者列不可更新
                let owner = existing.user_id.clone();
                *existing = item.clone();
                existing.user_id = owner;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok(items.len() < before)
    }
}

#[async_trait]
impl TermsRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<TermsAndConditions>, AppError> {
        Ok(self.terms.lock().unwrap().clone())
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<TermsAndConditions>, AppError> {
        Ok(self
            .terms
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TermsAndConditions>, AppError> {
        Ok(self.terms.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, terms: &TermsAndConditions) -> Result<(), AppError> {
        let mut all = self.terms.lock().unwrap();
        if all.iter().any(|t| t.user_id == terms.user_id) {
            return Err(AppError::conflict(
                "Terms and conditions already exist for this hoster",
            ));
        }
        all.push(terms.clone());
        Ok(())
    }

    async fn update(&self, terms: &TermsAndConditions) -> Result<bool, AppError> {
        let mut all = self.terms.lock().unwrap();
        match all.iter_mut().find(|t| t.id == terms.id) {
            Some(existing) => {
                existing.description = terms.description.clone();
                existing.updated_at = terms.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut all = self.terms.lock().unwrap();
        let before = all.len();
        all.retain(|t| t.id != id);
        Ok(all.len() < before)
    }
}

/// 测试应用：状态 + 底层存储 + 令牌服务
pub struct TestApp {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenService>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(create_test_config())
}

pub fn create_test_app_with(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let tokens = Arc::new(TokenService::from_config(&config).expect("token service"));
    let repos = Repositories {
        accounts: store.clone(),
        categories: store.clone(),
        items: store.clone(),
        terms: store.clone(),
    };
    let state = Arc::new(AppState::new(config, None, tokens.clone(), repos));

    TestApp {
        state,
        store,
        tokens,
    }
}

impl TestApp {
    /// 发送请求，返回状态码与 JSON body（空 body 为 Null）
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, json) = self.send_with_headers(request).await;
        (status, json)
    }

    /// 同 send_request，额外返回响应头
    pub async fn send_with_headers(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = routes::create_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, headers, json)
    }

    pub fn token_for(&self, user_id: &str, role: Role) -> String {
        self.tokens.issue(user_id, role).unwrap().access_token
    }

    /// 直接写入一个 hoster，返回其 ID
    pub fn seed_hoster(&self, id: &str, email: &str, password: &str) -> String {
        let mut hoster = hoster_fixture(id, email);
        hoster.password_hash = PasswordHasher::new().hash(password).unwrap();
        self.store.hosters.lock().unwrap().push(hoster);
        id.to_string()
    }

    pub fn seed_category(&self, id: &str, name: &str) {
        self.store
            .categories
            .lock()
            .unwrap()
            .push(category_fixture(id, name));
    }

    pub fn seed_item(&self, id: &str, owner: &str, category_id: &str) {
        self.store
            .items
            .lock()
            .unwrap()
            .push(item_fixture(id, owner, category_id));
    }

    pub fn item_exists(&self, id: &str) -> bool {
        self.store.items.lock().unwrap().iter().any(|i| i.id == id)
    }
}
