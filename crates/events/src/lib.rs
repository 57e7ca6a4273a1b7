//! Vigil mutation-event infrastructure.
//!
//! Building blocks for the real-time fan-out path:
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StatusEvent`] -- the canonical mutation event envelope, tagged with
//!   the organization it belongs to.
//!
//! Publishing is fire-and-forget: a mutation that persisted successfully is
//! reported as successful even if nobody is listening.

pub mod bus;

pub use bus::{EventAction, EventBus, EventKind, IncidentEventData, ServiceEventData, StatusEvent};
