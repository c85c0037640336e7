//! Error types for MargaNav

use thiserror::Error;

/// Navigation-level failures.
///
/// Only [`NavError::NoPathFound`] at session start is fatal; the others are
/// reported through guidance events while the session keeps running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    #[error("No path found from {start} to {goal}")]
    NoPathFound { start: String, goal: String },

    #[error("No position estimate available")]
    NoEstimateAvailable,

    #[error("Reroute from {from} to {goal} failed")]
    RerouteFailed { from: String, goal: String },

    #[error("No graph node on floor {floor}")]
    UnreachableFloor { floor: String },
}

/// MargaNav error type
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Invalid route request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Navigation(#[from] NavError),
}

impl From<serde_json::Error> for MargaError {
    fn from(e: serde_json::Error) -> Self {
        MargaError::Data(e.to_string())
    }
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
