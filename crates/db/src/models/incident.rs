//! Incident entity model and DTOs.
//!
//! An incident always references the service it affects. Its
//! `organization_id` is a denormalized copy taken from the request context
//! at creation time; it is never re-derived, even when the incident is
//! reassigned to a different service.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vigil_core::types::{DbId, Timestamp};

use crate::models::status::IncidentStatus;

/// A row from the `incidents` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub status: IncidentStatus,
    /// Id of the affected service, exposed as `service` on the wire.
    #[serde(rename = "service")]
    pub service_id: DbId,
    pub organization_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for reporting a new incident.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncident {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Id of the affected service.
    pub service: DbId,
    /// Defaults to New if omitted.
    pub status: Option<IncidentStatus>,
}

/// DTO for updating an existing incident. Only provided fields are applied.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncident {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub status: Option<IncidentStatus>,
    /// Reassign the incident to a different service. The incident's
    /// `organization_id` is not re-derived from the new service.
    pub service: Option<DbId>,
}
