//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caller from a JWT Bearer token.
//! - [`auth::OrgContext`] -- Requires a resolvable organization on top of authentication.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role within an organization.

pub mod auth;
pub mod rbac;
