//! Client-side reconciliation for the vigil dashboard.
//!
//! A connected client sees two streams of truth: periodic full snapshots
//! fetched over HTTP, and incremental mutation events pushed over the
//! WebSocket channel. This crate merges both into one local view:
//!
//! - [`StatusBoard`] -- the keyed local state with idempotent event
//!   application.
//! - [`Reconciler`] -- the loop that polls a [`SnapshotSource`] on a fixed
//!   interval and applies pushed events as they arrive.
//!
//! There is no vector clock or version counter: a snapshot response that
//! was produced before a pushed event can briefly roll the view back until
//! the next event or poll converges. This window is accepted; applications
//! that need stronger guarantees must poll less and trust the push stream.

pub mod board;
pub mod reconciler;

pub use board::{Snapshot, StatusBoard};
pub use reconciler::{Reconciler, SnapshotSource};
