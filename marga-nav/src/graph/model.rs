//! Graph schema shared with the data loader.

use serde::{Deserialize, Serialize};

/// A navigable point in the building.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub floor: String,
    /// Optional tag such as "gate", "elevator" or "platform"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, x: f64, y: f64, floor: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            floor: floor.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[inline]
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Edge attributes. Absent keys decode as `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAttrs {
    #[serde(default)]
    pub tactile: bool,
    #[serde(default)]
    pub stairs: bool,
    #[serde(default)]
    pub elevator: bool,
}

/// Undirected connection between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "len")]
    pub length: f64,
    #[serde(default)]
    pub attrs: EdgeAttrs,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, length: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            length,
            attrs: EdgeAttrs::default(),
        }
    }

    pub fn with_attrs(mut self, attrs: EdgeAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// True if this edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Raw building graph as loaded from disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
