//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`StatusEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application: HTTP
//! handlers publish after a successful mutation, the WebSocket fan-out task
//! subscribes and forwards frames to connected clients.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vigil_core::channels::{EVENT_INCIDENT, EVENT_SERVICE};
use vigil_core::types::{DbId, Timestamp};
use vigil_db::models::incident::Incident;
use vigil_db::models::service::Service;

// ---------------------------------------------------------------------------
// StatusEvent
// ---------------------------------------------------------------------------

/// What a mutation did to its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Create,
    Update,
    Delete,
}

/// Wire payload of a `service` frame.
///
/// `service` carries the full entity for create/update; `service_id` carries
/// the bare id for delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEventData {
    pub action: EventAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<DbId>,
}

/// Wire payload of an `incident` frame, same shape as [`ServiceEventData`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentEventData {
    pub action: EventAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident: Option<Incident>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<DbId>,
}

/// Which entity a [`StatusEvent`] describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    Service(ServiceEventData),
    Incident(IncidentEventData),
}

/// A mutation event as published on the bus.
///
/// Every event is tagged with the organization whose data changed; delivery
/// is filtered on this tag so one tenant's mutations are never pushed to
/// another tenant's connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub organization_id: String,
    pub kind: EventKind,
    pub timestamp: Timestamp,
}

impl StatusEvent {
    fn new(organization_id: impl Into<String>, kind: EventKind) -> Self {
        Self {
            organization_id: organization_id.into(),
            kind,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn service_created(org_id: impl Into<String>, service: Service) -> Self {
        Self::new(
            org_id,
            EventKind::Service(ServiceEventData {
                action: EventAction::Create,
                service: Some(service),
                service_id: None,
            }),
        )
    }

    pub fn service_updated(org_id: impl Into<String>, service: Service) -> Self {
        Self::new(
            org_id,
            EventKind::Service(ServiceEventData {
                action: EventAction::Update,
                service: Some(service),
                service_id: None,
            }),
        )
    }

    pub fn service_deleted(org_id: impl Into<String>, service_id: DbId) -> Self {
        Self::new(
            org_id,
            EventKind::Service(ServiceEventData {
                action: EventAction::Delete,
                service: None,
                service_id: Some(service_id),
            }),
        )
    }

    pub fn incident_created(org_id: impl Into<String>, incident: Incident) -> Self {
        Self::new(
            org_id,
            EventKind::Incident(IncidentEventData {
                action: EventAction::Create,
                incident: Some(incident),
                incident_id: None,
            }),
        )
    }

    pub fn incident_updated(org_id: impl Into<String>, incident: Incident) -> Self {
        Self::new(
            org_id,
            EventKind::Incident(IncidentEventData {
                action: EventAction::Update,
                incident: Some(incident),
                incident_id: None,
            }),
        )
    }

    pub fn incident_deleted(org_id: impl Into<String>, incident_id: DbId) -> Self {
        Self::new(
            org_id,
            EventKind::Incident(IncidentEventData {
                action: EventAction::Delete,
                incident: None,
                incident_id: Some(incident_id),
            }),
        )
    }

    /// The wire-level channel name of this event.
    pub fn event_name(&self) -> &'static str {
        match &self.kind {
            EventKind::Service(_) => EVENT_SERVICE,
            EventKind::Incident(_) => EVENT_INCIDENT,
        }
    }

    /// Serialize the event into the frame pushed to WebSocket clients:
    /// `{"event": "<name>", "data": {...}}`.
    pub fn to_frame(&self) -> serde_json::Value {
        let data = match &self.kind {
            EventKind::Service(data) => serde_json::to_value(data),
            EventKind::Incident(data) => serde_json::to_value(data),
        }
        .expect("event payloads serialize infallibly");

        serde_json::json!({
            "event": self.event_name(),
            "data": data,
        })
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`StatusEvent`].
pub struct EventBus {
    sender: broadcast::Sender<StatusEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// broadcast is best-effort and never part of the persistence contract.
    pub fn publish(&self, event: StatusEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
