//! Role-based access control (RBAC) extractors.
//!
//! Write operations are gated on the `admin` role; reads only require
//! membership (any role with a resolvable organization).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vigil_core::error::CoreError;
use vigil_core::roles::ROLE_ADMIN;

use super::auth::OrgContext;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role within a resolvable organization.
/// Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(ctx): RequireAdmin) -> AppResult<Json<()>> {
///     // ctx.organization_id is guaranteed present, ctx.role is "admin"
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub OrgContext);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = OrgContext::from_request_parts(parts, state).await?;
        if ctx.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(ctx))
    }
}
