//! Well-known WebSocket event channel name constants.
//!
//! These are the `event` field values of every pushed frame and must match
//! what the dashboard client subscribes to.

/// Frames describing a Service mutation (create/update/delete).
pub const EVENT_SERVICE: &str = "service";

/// Frames describing an Incident mutation (create/update/delete).
pub const EVENT_INCIDENT: &str = "incident";
