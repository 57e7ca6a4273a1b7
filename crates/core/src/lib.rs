//! Shared domain primitives for the vigil status platform.
//!
//! Holds the pieces every other crate needs: id/timestamp aliases, the
//! domain error type, role constants, and the wire-level event channel
//! names.

pub mod channels;
pub mod error;
pub mod roles;
pub mod types;
