//! JSON loaders for building data and recorded scan logs.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::DataConfig;
use crate::error::{MargaError, Result};
use crate::graph::{Graph, RouteGraph};
use crate::places::PlaceCatalog;
use crate::positioning::FingerprintTable;
use crate::signal::ScanFrame;

/// Read and decode one JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| MargaError::Data(format!("{}: {}", path.display(), e)))
}

/// Static data for one building, immutable once loaded.
#[derive(Clone, Debug)]
pub struct BuildingData {
    pub graph: RouteGraph,
    pub fingerprints: FingerprintTable,
    pub places: PlaceCatalog,
}

impl BuildingData {
    /// Load graph, fingerprints and (if present) the place catalog.
    pub fn load(config: &DataConfig) -> Result<Self> {
        let graph: Graph = load_json(&config.graph_path())?;
        let graph = RouteGraph::new(graph)?;

        let fingerprints: FingerprintTable = load_json(&config.fingerprints_path())?;
        if fingerprints.is_empty() {
            tracing::warn!("Fingerprint table is empty; no position estimates will be produced");
        }

        let places_path = config.places_path();
        let places = if places_path.exists() {
            load_json(&places_path)?
        } else {
            tracing::debug!("No place catalog at {:?}", places_path);
            PlaceCatalog::new()
        };

        tracing::info!(
            "Loaded building: {} nodes, {} edges, {} fingerprints on floors {:?}, {} places",
            graph.nodes().len(),
            graph.edges().len(),
            fingerprints.len(),
            fingerprints.floors(),
            places.len()
        );

        Ok(Self {
            graph,
            fingerprints,
            places,
        })
    }
}

/// Load a recorded scan log (JSON array of scan frames).
pub fn load_scan_log(path: &Path) -> Result<Vec<ScanFrame>> {
    let frames: Vec<ScanFrame> = load_json(path)?;
    tracing::debug!("Loaded {} scan frames from {:?}", frames.len(), path);
    Ok(frames)
}
