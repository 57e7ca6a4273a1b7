//! Event-to-WebSocket fan-out.
//!
//! [`EventFanout`] subscribes to the mutation event bus and forwards each
//! event, serialized as a JSON text frame, to the WebSocket connections of
//! the organization the event belongs to. Delivery is best-effort: there is
//! no buffering, replay, or acknowledgement, and a slow or disconnected
//! client simply misses frames.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use vigil_events::StatusEvent;

use crate::ws::WsManager;

/// Routes mutation events to connected dashboard clients.
pub struct EventFanout {
    ws_manager: Arc<WsManager>,
}

impl EventFanout {
    /// Create a new fan-out with the given WebSocket manager.
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main delivery loop.
    ///
    /// Consumes events from the broadcast channel until it is closed (i.e.
    /// the [`EventBus`](vigil_events::EventBus) is dropped). Events are
    /// delivered per organization in publish order.
    pub async fn run(self, mut receiver: broadcast::Receiver<StatusEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event fan-out lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, fan-out shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize one event and push it to its organization's connections.
    async fn deliver(&self, event: &StatusEvent) {
        let frame = event.to_frame().to_string();
        let delivered = self
            .ws_manager
            .broadcast_to_org(&event.organization_id, Message::Text(frame.into()))
            .await;

        tracing::debug!(
            event = event.event_name(),
            org = %event.organization_id,
            delivered,
            "Fanned out mutation event"
        );
    }
}
