//! Error types for wind-htm services.

use thiserror::Error;

/// Result type alias using WindError.
pub type WindResult<T> = Result<T, WindError>;

/// Primary error type for ingestion and query operations.
#[derive(Debug, Error)]
pub enum WindError {
    // === Ingestion Errors ===
    #[error("Invalid projection input: {0}")]
    InvalidProjectionInput(String),

    #[error("Invalid meta descriptor for dataset '{dataset}': {message}")]
    InvalidMeta { dataset: String, message: String },

    #[error("Malformed sample row in '{file}' line {line}: {message}")]
    MalformedRow {
        file: String,
        line: usize,
        message: String,
    },

    // === Mesh Errors ===
    /// Defensive invariant: every valid geodetic point lies in some root
    /// trixel, so this indicates a mesh or projection bug rather than bad
    /// user input.
    #[error("Point ({lat}, {lon}) outside mesh")]
    PointOutsideMesh { lat: f64, lon: f64 },

    #[error("Invalid trixel name: {0}")]
    InvalidTrixelName(String),

    // === Query Errors ===
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Infrastructure Errors ===
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl WindError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WindError::InvalidProjectionInput(_)
            | WindError::InvalidMeta { .. }
            | WindError::MalformedRow { .. }
            | WindError::InvalidTrixelName(_)
            | WindError::InvalidParameter { .. } => 400,

            WindError::DatasetNotFound(_) | WindError::LayerNotFound(_) => 404,

            _ => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for WindError {
    fn from(err: std::io::Error) -> Self {
        WindError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for WindError {
    fn from(err: serde_json::Error) -> Self {
        WindError::InternalError(format!("JSON error: {}", err))
    }
}
