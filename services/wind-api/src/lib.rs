//! Wind data query API.
//!
//! Read-only HTTP layer over persisted trixel indexes.

pub mod handlers;
pub mod metrics;
pub mod state;
