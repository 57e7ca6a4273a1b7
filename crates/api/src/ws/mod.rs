//! WebSocket infrastructure for real-time status updates.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler used by Axum routes. Every connection is tagged with
//! the organization from its own authenticated handshake; delivery is
//! always filtered on that tag.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
