//! 认证与角色授权中间件
//!
//! 请求顺序固定为：require_authentication → require_role → handler。

use crate::{
    auth::{
        jwt::{Claims, TokenService},
        role::Role,
    },
    error::AppError,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, Extensions, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 已验证的身份（附加到请求扩展，仅在签名与过期校验通过后创建）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

impl Identity {
    pub fn from_extensions(extensions: &Extensions) -> Option<&Identity> {
        extensions.get::<Identity>()
    }
}

// 在 handler 中直接提取 Identity；缺失时按未认证处理
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

/// 当前用户 ID；未认证时为空字符串
pub fn current_user_id(extensions: &Extensions) -> String {
    Identity::from_extensions(extensions)
        .map(|identity| identity.user_id.clone())
        .unwrap_or_default()
}

/// 当前角色；未认证时为空字符串
pub fn current_role(extensions: &Extensions) -> String {
    Identity::from_extensions(extensions)
        .map(|identity| identity.role.as_str().to_string())
        .unwrap_or_default()
}

/// 从 Authorization 头提取令牌，只接受 "Bearer <token>" 两段式
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = match headers.get(AUTHORIZATION) {
        None => return Err(AppError::MissingToken),
        Some(value) if value.is_empty() => return Err(AppError::MissingToken),
        Some(value) => value.to_str().map_err(|_| AppError::MalformedToken)?,
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::MalformedToken),
    }
}

/// JWT 认证中间件 - 必须认证
pub async fn require_authentication(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = tokens.verify(extract_bearer(req.headers())?)?;
    let identity = Identity::from(claims);

    tracing::debug!(
        user_id = %identity.user_id,
        role = %identity.role,
        "Request authenticated"
    );

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// 允许通过的角色集合
///
/// 多个 gate 串联时取交集：`a.and(b)` 与依次经过 a、b 两个中间件等价。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    mask: u8,
}

impl RoleGate {
    fn bit(role: Role) -> u8 {
        match role {
            Role::Admin => 0b001,
            Role::Hoster => 0b010,
            Role::Customer => 0b100,
        }
    }

    pub fn only(role: Role) -> Self {
        Self {
            mask: Self::bit(role),
        }
    }

    pub fn any_of(roles: &[Role]) -> Self {
        Self {
            mask: roles.iter().fold(0, |mask, role| mask | Self::bit(*role)),
        }
    }

    pub fn and(self, other: RoleGate) -> Self {
        Self {
            mask: self.mask & other.mask,
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.mask & Self::bit(role) != 0
    }

    fn denial_message(&self) -> &'static str {
        let mut allowed = Role::ALL.into_iter().filter(|role| self.permits(*role));
        match (allowed.next(), allowed.next()) {
            (Some(role), None) => role.access_required_message(),
            _ => "Insufficient role for this resource",
        }
    }
}

/// 角色授权中间件，必须挂在 require_authentication 之后
pub async fn require_role(
    State(gate): State<RoleGate>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = Identity::from_extensions(req.extensions()).cloned();

    match identity {
        None => {
            // 路由装配错误：没有身份就不放行
            tracing::error!(
                path = %req.uri().path(),
                "Role gate reached without an authenticated identity"
            );
            Err(AppError::Unauthenticated)
        }
        Some(identity) if !gate.permits(identity.role) => {
            tracing::warn!(
                user_id = %identity.user_id,
                role = %identity.role,
                path = %req.uri().path(),
                "Role not permitted"
            );
            Err(AppError::ForbiddenRole(gate.denial_message().to_string()))
        }
        Some(_) => Ok(next.run(req).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_token_valid() {
        let headers = headers_with("Bearer test_token_123");
        assert_eq!(extract_bearer(&headers).unwrap(), "test_token_123");
    }

    #[test]
    fn test_extract_token_missing() {
        assert!(matches!(extract_bearer(&HeaderMap::new()), Err(AppError::MissingToken)));
        assert!(matches!(extract_bearer(&headers_with("")), Err(AppError::MissingToken)));
    }

    #[test]
    fn test_extract_token_invalid_format() {
        for value in [
            "Basic xyz",
            "Bearer",
            "Bearer ",
            "bearer abc",
            "Bearer a b",
            "InvalidFormat",
            "Token abc",
        ] {
            assert!(
                matches!(extract_bearer(&headers_with(value)), Err(AppError::MalformedToken)),
                "accepted {:?}",
                value
            );
        }
    }

    #[test]
    fn test_identity_accessors() {
        let mut extensions = Extensions::new();
        assert_eq!(current_user_id(&extensions), "");
        assert_eq!(current_role(&extensions), "");

        extensions.insert(Identity {
            user_id: "u1".to_string(),
            role: Role::Hoster,
        });
        assert_eq!(current_user_id(&extensions), "u1");
        assert_eq!(current_role(&extensions), "hoster");
        // 读取无副作用
        assert_eq!(current_user_id(&extensions), "u1");
    }

    #[test]
    fn test_role_gate_permits() {
        let gate = RoleGate::only(Role::Admin);
        assert!(gate.permits(Role::Admin));
        assert!(!gate.permits(Role::Hoster));
        assert!(!gate.permits(Role::Customer));

        let gate = RoleGate::any_of(&[Role::Hoster, Role::Customer]);
        assert!(!gate.permits(Role::Admin));
        assert!(gate.permits(Role::Hoster));
        assert!(gate.permits(Role::Customer));
    }

    #[test]
    fn test_role_gate_chain_is_conjunction() {
        let admin = RoleGate::only(Role::Admin);
        let hoster = RoleGate::only(Role::Hoster);
        let both = RoleGate::any_of(&Role::ALL);

        for role in Role::ALL {
            assert!(!admin.and(hoster).permits(role));
            assert_eq!(
                admin.and(hoster).and(both).permits(role),
                admin.and(hoster.and(both)).permits(role)
            );
            assert_eq!(hoster.and(both).permits(role), hoster.permits(role));
        }
    }

    #[test]
    fn test_denial_messages() {
        assert_eq!(RoleGate::only(Role::Admin).denial_message(), "Admin access required");
        assert_eq!(RoleGate::only(Role::Hoster).denial_message(), "Hoster access required");
        assert_eq!(
            RoleGate::any_of(&[Role::Admin, Role::Hoster]).denial_message(),
            "Insufficient role for this resource"
        );
    }
}
