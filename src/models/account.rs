//! Account domain models (admin, hoster, customer)

use chrono::{DateTime, Utc};
use std::fmt;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Administrator account
#[derive(Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hoster (store owner renting out items)
#[derive(Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hoster {
    pub id: String,
    pub full_name: String,
    pub profile_photo: Option<String>,
    pub store_name: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub address: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer renting items
#[derive(Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: String,
    pub full_name: String,
    pub profile_photo: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub address: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal row used by login: id and stored hash only
#[derive(Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub id: String,
    pub password_hash: String,
}

/// Admin registration request
#[derive(Deserialize, Validate)]
pub struct RegisterAdminRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub password: String,
}

/// Hoster registration request
#[derive(Deserialize, Validate)]
pub struct RegisterHosterRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Store name is required"))]
    pub store_name: String,
    pub profile_photo: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Customer registration request
#[derive(Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub password: String,
    pub profile_photo: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Login request, shared by all three account types
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Debug output never includes passwords or password hashes.

impl fmt::Debug for Admin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Hoster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hoster")
            .field("id", &self.id)
            .field("store_name", &self.store_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisterAdminRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterAdminRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisterHosterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterHosterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("store_name", &self.store_name)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisterCustomerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCustomerRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
