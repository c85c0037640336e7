//! Building route graph.
//!
//! This module provides:
//! - Graph schema types as delivered by the data loader
//! - [`RouteGraph`]: validated, immutable graph with least-length routing
//!   and nearest-node queries

mod model;
mod router;

pub use model::{EdgeAttrs, Graph, GraphEdge, GraphNode};
pub use router::{Path, RouteGraph};
