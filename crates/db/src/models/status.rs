//! Status vocabularies for services and incidents.
//!
//! The two vocabularies are deliberately distinct: a service describes its
//! current operational level, an incident describes where it sits in its
//! lifecycle. Both map to Postgres enum types, so an out-of-vocabulary value
//! is rejected at the store boundary as well as at the JSON boundary.

use serde::{Deserialize, Serialize};

/// Operational level of a monitored service (`service_status` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_status")]
pub enum ServiceStatus {
    Operational,
    #[serde(rename = "Degraded Performance")]
    #[sqlx(rename = "Degraded Performance")]
    DegradedPerformance,
    #[serde(rename = "Partial Outage")]
    #[sqlx(rename = "Partial Outage")]
    PartialOutage,
    #[serde(rename = "Major Outage")]
    #[sqlx(rename = "Major Outage")]
    MajorOutage,
}

/// Lifecycle state of a reported incident (`incident_status` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "incident_status")]
pub enum IncidentStatus {
    New,
    Acknowledged,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    #[sqlx(rename = "On Hold")]
    OnHold,
    Escalated,
    Resolved,
    Monitoring,
    Closed,
    Reopened,
    Cancelled,
}
