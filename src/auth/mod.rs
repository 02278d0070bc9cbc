//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod role;

pub use jwt::{Claims, TokenError, TokenKind, TokenResponse, TokenService};
pub use middleware::{
    current_role, current_user_id, extract_bearer, require_authentication, require_role,
    Identity, RoleGate,
};
pub use ownership::{authorize_owner, fetch_owned, Owned};
pub use password::{PasswordError, PasswordHasher};
pub use role::Role;
