//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vigil_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Carries the raw claims; most handlers want [`OrgContext`] instead, which
/// additionally guarantees an organization is resolvable.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's user id at the identity provider.
    pub user_id: String,
    /// The caller's active organization, if any.
    pub organization_id: Option<String>,
    /// The caller's role name (`"admin"` or `"member"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            organization_id: claims.org,
            role: claims.role,
        })
    }
}

/// An authenticated caller with a resolvable organization.
///
/// Every organization-scoped endpoint uses this extractor; a caller without
/// an organization gets a 404 "Organization not found" before any store
/// access, never a partial view.
#[derive(Debug, Clone)]
pub struct OrgContext {
    pub user_id: String,
    pub organization_id: String,
    pub role: String,
}

impl FromRequestParts<AppState> for OrgContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let organization_id = user
            .organization_id
            .ok_or(AppError::Core(CoreError::OrganizationMissing))?;

        Ok(OrgContext {
            user_id: user.user_id,
            organization_id,
            role: user.role,
        })
    }
}
