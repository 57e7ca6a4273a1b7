//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! `organization_id` never appears in a client-facing DTO; it is injected
//! from the authenticated request context by the API layer.

pub mod incident;
pub mod service;
pub mod status;
