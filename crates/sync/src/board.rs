//! Keyed local state for one organization's dashboard.

use std::collections::BTreeMap;

use vigil_core::types::DbId;
use vigil_db::models::incident::Incident;
use vigil_db::models::service::Service;
use vigil_events::{EventAction, EventKind, StatusEvent};

/// A full point-in-time view as returned by the snapshot endpoints.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub services: Vec<Service>,
    pub incidents: Vec<Incident>,
}

/// Local dashboard state, keyed by entity id.
///
/// All merge operations are idempotent: applying the same event twice
/// yields the same state as applying it once, and deleting an absent id is
/// a no-op. Events tagged with a different organization are ignored.
#[derive(Debug)]
pub struct StatusBoard {
    organization_id: String,
    services: BTreeMap<DbId, Service>,
    incidents: BTreeMap<DbId, Incident>,
}

impl StatusBoard {
    /// Create an empty board for the given organization.
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            services: BTreeMap::new(),
            incidents: BTreeMap::new(),
        }
    }

    /// Replace the entire local state with a freshly fetched snapshot.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.services = snapshot.services.into_iter().map(|s| (s.id, s)).collect();
        self.incidents = snapshot.incidents.into_iter().map(|i| (i.id, i)).collect();
    }

    /// Apply one pushed mutation event.
    ///
    /// Create and update are both keyed upserts; delete removes by id.
    /// Deleting a service also drops the incidents referencing it, matching
    /// the server's cascading delete (for which no per-incident events are
    /// emitted).
    pub fn apply(&mut self, event: &StatusEvent) {
        if event.organization_id != self.organization_id {
            return;
        }

        match &event.kind {
            EventKind::Service(data) => match data.action {
                EventAction::Create | EventAction::Update => {
                    if let Some(service) = &data.service {
                        self.services.insert(service.id, service.clone());
                    }
                }
                EventAction::Delete => {
                    if let Some(id) = data.service_id {
                        self.services.remove(&id);
                        self.incidents.retain(|_, incident| incident.service_id != id);
                    }
                }
            },
            EventKind::Incident(data) => match data.action {
                EventAction::Create | EventAction::Update => {
                    if let Some(incident) = &data.incident {
                        self.incidents.insert(incident.id, incident.clone());
                    }
                }
                EventAction::Delete => {
                    if let Some(id) = data.incident_id {
                        self.incidents.remove(&id);
                    }
                }
            },
        }
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn service(&self, id: DbId) -> Option<&Service> {
        self.services.get(&id)
    }

    pub fn incident(&self, id: DbId) -> Option<&Incident> {
        self.incidents.get(&id)
    }

    /// All known services, in id order.
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    /// All known incidents, in id order.
    pub fn incidents(&self) -> impl Iterator<Item = &Incident> {
        self.incidents.values()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn incident_count(&self) -> usize {
        self.incidents.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
