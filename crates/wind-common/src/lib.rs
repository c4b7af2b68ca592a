//! Common types and utilities shared across all wind-htm services.

pub mod error;
pub mod geo;
pub mod sample;

pub use error::{WindError, WindResult};
pub use geo::{GeodeticPoint, EARTH_CIRCUMFERENCE, EARTH_RADIUS};
pub use sample::Sample;
