//! Token validation for the external identity provider.
//!
//! This service does not issue identities: callers arrive with an HS256
//! bearer token whose claims carry the user id, organization id, and role.
//! Only validation lives here.

pub mod jwt;
