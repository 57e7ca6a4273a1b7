//! Request handlers for the status resources.
//!
//! Each submodule provides async handler functions (create, list, get_by_id,
//! update, delete) for a single entity type. Handlers resolve the caller's
//! organization, delegate to the corresponding repository in `vigil_db`,
//! publish a mutation event on success, and map errors via
//! [`AppError`](crate::error::AppError).
//!
//! Persistence and broadcast are sequenced, not atomic: once the store
//! accepted the write, the HTTP response is a success even if nobody
//! receives the event.

pub mod incident;
pub mod service;
