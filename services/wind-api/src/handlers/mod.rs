//! HTTP request handlers.
//!
//! - `api`: the data endpoints (/datasets, /simplified, /trixels-in-radius,
//!   /detailed-by-trixel-names) and the admin reload
//! - `metrics`: health checks and the metrics endpoint
//! - `common`: the JSON error envelope

pub mod api;
pub mod common;
pub mod metrics;

pub use api::{
    datasets_handler, detailed_by_trixel_names_handler, reload_handler, simplified_handler,
    trixels_in_radius_handler, DetailedRequest, RadiusQuery, SimplifiedQuery,
};
pub use common::ApiError;
pub use metrics::{health_handler, metrics_handler, ready_handler};
