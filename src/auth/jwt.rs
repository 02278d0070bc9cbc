//! JWT token generation and validation
//! Implements access token + refresh token pattern

use crate::{auth::role::Role, config::AppConfig, error::AppError};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::{distributions::Alphanumeric, Rng};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access tokens live for exactly one hour
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Distinguishes the two token flavours signed with the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Role of the subject; unknown strings fail deserialization
    pub role: Role,

    /// Issued at
    pub iat: i64,

    /// Expiration; the token is valid strictly before this instant
    pub exp: i64,

    /// Token flavour
    pub typ: TokenKind,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Login/registration response.
///
/// Field names are part of the public wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Token verification and signing failures.
///
/// Display strings never include the token itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token could not be parsed")]
    Malformed,

    #[error("token is not a well-formed JWT")]
    InvalidFormat,

    #[error("failed to sign token")]
    Signing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidToken => TokenError::InvalidFormat,
            _ => TokenError::Malformed,
        }
    }
}

/// JWT service
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    refresh_token_exp_secs: i64,
}

impl TokenService {
    /// Create the token service from config.
    ///
    /// Without a configured secret this only succeeds in development, where an
    /// ephemeral per-process secret is generated.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let refresh_exp = config.security.refresh_token_exp_secs as i64;

        match &config.security.jwt_secret {
            Some(secret) => {
                let secret = secret.expose_secret();
                if secret.len() < crate::config::MIN_JWT_SECRET_LEN {
                    return Err(AppError::Config(
                        "JWT secret too short (min 32 chars)".to_string(),
                    ));
                }
                Ok(Self::new(secret.as_bytes(), refresh_exp))
            }
            None if config.app.environment.is_development() => {
                tracing::warn!(
                    "No JWT secret configured; using an ephemeral development secret. \
                     Tokens will not survive a restart"
                );
                let secret: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(64)
                    .map(char::from)
                    .collect();
                Ok(Self::new(secret.as_bytes(), refresh_exp))
            }
            None => Err(AppError::Config(
                "JWT secret is required outside development".to_string(),
            )),
        }
    }

    pub fn new(secret: &[u8], refresh_token_exp_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 过期检查由 verify_at 以 "now < exp" 的语义自行完成
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            refresh_token_exp_secs,
        }
    }

    /// Issue an access/refresh pair for a subject
    pub fn issue(&self, user_id: &str, role: Role) -> Result<TokenResponse, TokenError> {
        self.issue_at(user_id, role, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: &str, role: Role, now: i64) -> Result<TokenResponse, TokenError> {
        let access_token = self.sign(user_id, role, TokenKind::Access, now, ACCESS_TOKEN_TTL_SECS)?;
        let refresh_token =
            self.sign(user_id, role, TokenKind::Refresh, now, self.refresh_token_exp_secs)?;

        Ok(TokenResponse {
            id: user_id.to_string(),
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: ACCESS_TOKEN_TTL_SECS,
        })
    }

    fn sign(
        &self,
        user_id: &str,
        role: Role,
        typ: TokenKind,
        now: i64,
        ttl_secs: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now,
            exp: now + ttl_secs,
            typ,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = ?e.kind(), "Failed to encode token");
            TokenError::Signing
        })
    }

    /// Verify an access token against the current clock
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        self.decode_kind(token, TokenKind::Access, now)
    }

    /// Verify a refresh token against the current clock
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_refresh_at(token, Utc::now().timestamp())
    }

    pub fn verify_refresh_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        self.decode_kind(token, TokenKind::Refresh, now)
    }

    fn decode_kind(&self, token: &str, expected: TokenKind, now: i64) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "Token validation failed");
                TokenError::from(e)
            })?
            .claims;

        if claims.exp <= claims.iat || claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        if claims.typ != expected {
            tracing::debug!(expected = ?expected, actual = ?claims.typ, "Token type mismatch");
            return Err(TokenError::Malformed);
        }

        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
