//! Poll/push merge loop.
//!
//! [`Reconciler::run`] keeps a shared [`StatusBoard`] current by polling a
//! [`SnapshotSource`] on a fixed interval and applying pushed
//! [`StatusEvent`]s as they arrive, until cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use vigil_events::StatusEvent;

use crate::board::{Snapshot, StatusBoard};

/// Where full snapshots come from (in production: the `/api` list
/// endpoints). Abstracted so tests can feed canned snapshots.
#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, Box<dyn std::error::Error + Send + Sync>>;
}

/// Merges periodic snapshot polls and pushed events into one board.
pub struct Reconciler<S> {
    source: S,
    board: Arc<RwLock<StatusBoard>>,
    poll_interval: Duration,
}

impl<S: SnapshotSource> Reconciler<S> {
    pub fn new(source: S, board: Arc<RwLock<StatusBoard>>, poll_interval: Duration) -> Self {
        Self {
            source,
            board,
            poll_interval,
        }
    }

    /// Run until `cancel` fires or the event channel closes.
    ///
    /// A failed poll logs a warning and leaves the board untouched; the
    /// next interval retries. Lagged event receivers skip the lost events
    /// and rely on the next poll to converge.
    pub async fn run(self, mut events: broadcast::Receiver<StatusEvent>, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Reconciler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    match self.source.fetch().await {
                        Ok(snapshot) => {
                            self.board.write().await.replace_snapshot(snapshot);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Snapshot poll failed");
                        }
                    }
                }
                result = events.recv() => match result {
                    Ok(event) => {
                        self.board.write().await.apply(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Reconciler lagged behind the event stream");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Event stream closed, reconciler stopping");
                        break;
                    }
                },
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_db::models::service::Service;
    use vigil_db::models::status::ServiceStatus;
    use vigil_events::EventBus;

    const ORG: &str = "org_1";

    struct CannedSource {
        snapshot: Snapshot,
    }

    #[async_trait::async_trait]
    impl SnapshotSource for CannedSource {
        async fn fetch(&self) -> Result<Snapshot, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.snapshot.clone())
        }
    }

    fn service(name: &str) -> Service {
        Service {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            status: ServiceStatus::Operational,
            organization_id: ORG.to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn first_poll_seeds_the_board_and_events_patch_it() {
        let seeded = service("API");
        let source = CannedSource {
            snapshot: Snapshot {
                services: vec![seeded.clone()],
                incidents: vec![],
            },
        };

        let board = Arc::new(RwLock::new(StatusBoard::new(ORG)));
        let bus = EventBus::default();
        let cancel = CancellationToken::new();

        let reconciler = Reconciler::new(source, Arc::clone(&board), Duration::from_secs(3600));
        let handle = tokio::spawn(reconciler.run(bus.subscribe(), cancel.clone()));

        // The interval fires immediately, seeding the board from the poll.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(board.read().await.service(seeded.id).is_some());

        // A pushed event lands without waiting for the next poll.
        let pushed = service("Web");
        bus.publish(vigil_events::StatusEvent::service_created(ORG, pushed.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(board.read().await.service(pushed.id).is_some());

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let source = CannedSource {
            snapshot: Snapshot::default(),
        };
        let board = Arc::new(RwLock::new(StatusBoard::new(ORG)));
        let bus = EventBus::default();
        let cancel = CancellationToken::new();

        let reconciler = Reconciler::new(source, board, Duration::from_secs(3600));
        let handle = tokio::spawn(reconciler.run(bus.subscribe(), cancel.clone()));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reconciler should stop promptly after cancellation")
            .unwrap();
    }
}
