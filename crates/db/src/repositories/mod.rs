//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Every read, update, and delete
//! filters on the conjunction of the row id and the caller's organization
//! id; a row belonging to another organization is indistinguishable from an
//! absent one (`None`), never an error.

pub mod incident_repo;
pub mod service_repo;

pub use incident_repo::IncidentRepo;
pub use service_repo::ServiceRepo;
