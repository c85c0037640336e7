//! MargaNav - Indoor wayfinding core
//!
//! Turns a stream of beacon RSSI readings into step-by-step walking
//! guidance through a multi-floor building graph.
//!
//! ## Pipeline
//!
//! ```text
//! SignalReading ──▶ RssiSmoother ──▶ KnnPositioner ──▶ GuidanceSession ──▶ GuidanceEvent
//!                                                          │
//!                                                     RouteGraph
//!                                               (plan + reroute queries)
//! ```
//!
//! - **signal**: per-source exponential moving average
//! - **positioning**: k-nearest-neighbour fingerprint matching
//! - **graph**: validated building graph, shortest-path and nearest-node queries
//! - **guidance**: arrival, off-route and floor-transition state machine
//!
//! Static building data (graph, fingerprints, places) is immutable after
//! loading and shared through `Arc`; each guidance session is driven by a
//! single stream of estimates.

pub mod config;
pub mod error;
pub mod graph;
pub mod guidance;
pub mod io;
pub mod navigator;
pub mod places;
pub mod positioning;
pub mod signal;
pub mod utils;

pub use config::MargaConfig;
pub use error::{MargaError, NavError, Result};
pub use graph::{Graph, GraphEdge, GraphNode, Path, RouteGraph};
pub use guidance::{
    DebugSnapshot, Emphasis, GuidanceConfig, GuidanceEvent, GuidanceSession, GuidanceState,
};
pub use io::BuildingData;
pub use navigator::Navigator;
pub use places::{PlaceCatalog, PlaceInfo};
pub use positioning::{FingerprintTable, KnnPositioner, PositionEstimate};
pub use signal::{RssiSmoother, ScanFrame, SignalReading};
