//! Ownership authorization for user-owned resources.
//!
//! Used by every owner-scoped read and mutation on items and terms. Absence
//! is reported as NotFound before the owner id is compared against the
//! authenticated identity. Role plays no part here.

use crate::{auth::middleware::Identity, error::AppError};
use std::future::Future;

/// Resources that belong to a single user
pub trait Owned {
    fn owner_id(&self) -> &str;
}

/// Check a looked-up resource against the caller.
///
/// `what` names the resource in error messages ("item", "terms").
pub fn authorize_owner<R: Owned>(
    resource: Option<R>,
    identity: &Identity,
    what: &str,
) -> Result<R, AppError> {
    let Some(resource) = resource else {
        return Err(AppError::not_found(what));
    };

    if resource.owner_id() != identity.user_id {
        tracing::warn!(
            user_id = %identity.user_id,
            owner_id = %resource.owner_id(),
            resource = what,
            "Ownership check failed"
        );
        return Err(AppError::OwnershipDenied(what.to_string()));
    }

    Ok(resource)
}

/// Fetch a resource and check ownership in one step.
///
/// Repository errors are returned before any ownership decision.
pub async fn fetch_owned<R, F, Fut>(identity: &Identity, what: &str, fetch: F) -> Result<R, AppError>
where
    R: Owned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<R>, AppError>>,
{
    let resource = fetch().await?;
    authorize_owner(resource, identity, what)
}
