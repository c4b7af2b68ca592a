//! Data endpoints backed by the current index snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;
use tracing::{info, instrument};

use htm::{Mesh, TrixelGeometry};
use wind_common::{GeodeticPoint, Sample, WindError};

use crate::handlers::common::ApiError;
use crate::metrics::MetricsCollector;
use crate::state::AppState;

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SimplifiedQuery {
    pub dataset: String,
    pub layer: String,
}

#[derive(Debug, Deserialize)]
pub struct RadiusQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
}

#[derive(Debug, Deserialize)]
pub struct DetailedRequest {
    pub dataset: String,
    pub trixels: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /datasets - dataset names and their layer names
#[instrument(skip(state))]
pub async fn datasets_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<BTreeMap<String, Vec<String>>> {
    MetricsCollector::incr(&state.metrics.dataset_requests);

    let snapshot = state.store.get().await;
    Json(snapshot.list_datasets())
}

/// GET /simplified?dataset=&layer= - the precomputed layer overview
#[instrument(skip(state))]
pub async fn simplified_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<SimplifiedQuery>,
) -> Result<Json<Vec<Sample>>, ApiError> {
    MetricsCollector::incr(&state.metrics.simplified_requests);

    let snapshot = state.store.get().await;
    let index = snapshot.dataset(&query.dataset)?;
    let overview = index.overview(&query.layer)?;

    info!(
        dataset = %query.dataset,
        layer = %query.layer,
        samples = overview.len(),
        "Simplified request"
    );

    Ok(Json(overview.to_vec()))
}

/// GET /trixels-in-radius?lat=&lon=&radius= - leaf trixels intersecting the
/// geodesic disk
#[instrument(skip(state))]
pub async fn trixels_in_radius_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<RadiusQuery>,
) -> Result<Json<Vec<TrixelGeometry>>, ApiError> {
    MetricsCollector::incr(&state.metrics.radius_requests);

    validate_radius_query(&query, state.max_radius_m)?;

    let snapshot = state.store.get().await;
    let depth = snapshot.mesh_depth().unwrap_or(state.default_mesh_depth);
    let mesh = Mesh::new(depth);

    let trixels = mesh.trixels_near(GeodeticPoint::new(query.lat, query.lon), query.radius)?;

    info!(
        lat = query.lat,
        lon = query.lon,
        radius = query.radius,
        trixels = trixels.len(),
        "Radius request"
    );

    Ok(Json(trixels.iter().map(|t| t.geometry()).collect()))
}

/// POST /detailed-by-trixel-names - batch per-trixel sample lookup
#[instrument(skip(state, request), fields(dataset = %request.dataset))]
pub async fn detailed_by_trixel_names_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<DetailedRequest>,
) -> Result<Json<BTreeMap<String, Vec<Sample>>>, ApiError> {
    MetricsCollector::incr(&state.metrics.detailed_requests);

    let snapshot = state.store.get().await;
    let index = snapshot.dataset(&request.dataset)?;

    // an empty name list never touches the index
    if request.trixels.is_empty() {
        return Ok(Json(BTreeMap::new()));
    }

    Ok(Json(index.samples_by_trixel_names(&request.trixels)))
}

/// POST /admin/reload - rescan the data directory and swap the snapshot
#[instrument(skip(state))]
pub async fn reload_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    MetricsCollector::incr(&state.metrics.reloads);

    let snapshot = state.catalog.load_snapshot()?;
    let datasets = snapshot.len();
    state.store.swap(snapshot).await;

    info!(datasets, "Snapshot reloaded");
    Ok(Json(serde_json::json!({ "datasets": datasets })))
}

// ============================================================================
// Validation
// ============================================================================

fn validate_radius_query(query: &RadiusQuery, max_radius_m: f64) -> Result<(), WindError> {
    let invalid = |param: &str, message: String| WindError::InvalidParameter {
        param: param.to_string(),
        message,
    };

    if !(-90.0..=90.0).contains(&query.lat) {
        return Err(invalid("lat", "latitude must be between -90 and 90".into()));
    }
    if !(-180.0..=180.0).contains(&query.lon) {
        return Err(invalid(
            "lon",
            "longitude must be between -180 and 180".into(),
        ));
    }
    if !query.radius.is_finite() || query.radius < 0.0 {
        return Err(invalid(
            "radius",
            "radius must be greater than or equal to 0".into(),
        ));
    }
    if query.radius > max_radius_m {
        return Err(invalid(
            "radius",
            format!("radius must be less than or equal to {}", max_radius_m),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: f64, lon: f64, radius: f64) -> RadiusQuery {
        RadiusQuery { lat, lon, radius }
    }

    #[test]
    fn test_radius_query_validation() {
        assert!(validate_radius_query(&query(52.5, 13.3, 500.0), 1_000.0).is_ok());
        assert!(validate_radius_query(&query(52.5, 13.3, 0.0), 1_000.0).is_ok());

        assert!(validate_radius_query(&query(90.5, 13.3, 500.0), 1_000.0).is_err());
        assert!(validate_radius_query(&query(52.5, -180.1, 500.0), 1_000.0).is_err());
        assert!(validate_radius_query(&query(52.5, 13.3, -1.0), 1_000.0).is_err());
        assert!(validate_radius_query(&query(52.5, 13.3, 1_500.0), 1_000.0).is_err());
        assert!(validate_radius_query(&query(52.5, 13.3, f64::NAN), 1_000.0).is_err());
    }
}
