//! Authentication-related models

use crate::auth::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token refresh request
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenRequest").finish_non_exhaustive()
    }
}

/// Identity of the caller as seen by the server
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: String,
    pub role: Role,
}
