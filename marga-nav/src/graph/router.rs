//! Validated route graph with shortest-path and nearest-node queries.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::error::{MargaError, Result};

use super::model::{Graph, GraphEdge, GraphNode};

/// A planned route: ordered nodes from start to goal.
///
/// An empty path means no route exists. A single-node path is the
/// degenerate start == goal route.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub nodes: Vec<GraphNode>,
    /// Sum of edge lengths along the path
    pub length: f64,
}

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn last(&self) -> Option<&GraphNode> {
        self.nodes.last()
    }

    /// Node ids in order, for logging.
    pub fn ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Accumulated route length, totally ordered for the frontier heap.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Immutable building graph.
///
/// The undirected adjacency list is built once at construction; every
/// query afterwards is read-only, so a `RouteGraph` can be shared across
/// threads behind an `Arc` without locking.
#[derive(Clone, Debug)]
pub struct RouteGraph {
    graph: Graph,
    /// Node id -> index into `graph.nodes`
    index: HashMap<String, usize>,
    /// adjacency[i] = [(neighbor_idx, length), ...] in edge declaration order
    adjacency: Vec<Vec<(usize, f64)>>,
    /// Unordered node pair -> first declared edge between them
    edge_lookup: HashMap<(usize, usize), usize>,
}

impl RouteGraph {
    /// Validate a raw graph and build its adjacency.
    ///
    /// Fails on duplicate node ids, edges referencing unknown nodes, and
    /// negative or non-finite edge lengths.
    pub fn new(graph: Graph) -> Result<Self> {
        let mut index = HashMap::with_capacity(graph.nodes.len());
        for (i, node) in graph.nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(MargaError::InvalidGraph(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
        }

        let mut adjacency = vec![Vec::new(); graph.nodes.len()];
        let mut edge_lookup = HashMap::with_capacity(graph.edges.len());

        for (ei, edge) in graph.edges.iter().enumerate() {
            let a = *index.get(&edge.from).ok_or_else(|| {
                MargaError::InvalidGraph(format!("edge references unknown node {}", edge.from))
            })?;
            let b = *index.get(&edge.to).ok_or_else(|| {
                MargaError::InvalidGraph(format!("edge references unknown node {}", edge.to))
            })?;
            if !edge.length.is_finite() || edge.length < 0.0 {
                return Err(MargaError::InvalidGraph(format!(
                    "edge {}-{} has invalid length {}",
                    edge.from, edge.to, edge.length
                )));
            }

            adjacency[a].push((b, edge.length));
            adjacency[b].push((a, edge.length));
            edge_lookup.entry((a.min(b), a.max(b))).or_insert(ei);
        }

        tracing::debug!(
            "Route graph: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );

        Ok(Self {
            graph,
            index,
            adjacency,
            edge_lookup,
        })
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.graph.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.graph.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.graph.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// First declared edge joining `a` and `b`, in either direction.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        let ia = *self.index.get(a)?;
        let ib = *self.index.get(b)?;
        self.edge_lookup
            .get(&(ia.min(ib), ia.max(ib)))
            .map(|&ei| &self.graph.edges[ei])
    }

    /// Shortest path between two node ids.
    ///
    /// Returns an empty path if either id is unknown or the goal is
    /// unreachable. Identical input always yields the identical sequence.
    pub fn shortest_path(&self, start_id: &str, goal_id: &str) -> Path {
        let (Some(&start), Some(&goal)) = (self.index.get(start_id), self.index.get(goal_id))
        else {
            tracing::debug!("shortest_path: unknown node {} or {}", start_id, goal_id);
            return Path::empty();
        };

        let Some((route, length)) = self.search(start, goal) else {
            tracing::debug!("shortest_path: {} unreachable from {}", goal_id, start_id);
            return Path::empty();
        };

        Path {
            nodes: route
                .into_iter()
                .map(|i| self.graph.nodes[i].clone())
                .collect(),
            length,
        }
    }

    /// Uniform-cost search from `start`, stopping once `goal` is settled.
    ///
    /// The frontier pops the lowest cost first and the lower node index on
    /// equal cost; a neighbour is only re-labelled on a strictly shorter
    /// route. Returns node indices from start to goal and the total length.
    fn search(&self, start: usize, goal: usize) -> Option<(Vec<usize>, f64)> {
        let n = self.graph.nodes.len();
        let mut best = vec![f64::INFINITY; n];
        let mut via: Vec<Option<usize>> = vec![None; n];
        let mut frontier = BinaryHeap::new();

        best[start] = 0.0;
        frontier.push(Reverse((Cost(0.0), start)));

        while let Some(Reverse((Cost(cost), node))) = frontier.pop() {
            if node == goal {
                break;
            }
            // Superseded by a shorter route pushed later
            if cost > best[node] {
                continue;
            }
            for &(next, length) in &self.adjacency[node] {
                let candidate = cost + length;
                if candidate < best[next] {
                    best[next] = candidate;
                    via[next] = Some(node);
                    frontier.push(Reverse((Cost(candidate), next)));
                }
            }
        }

        if !best[goal].is_finite() {
            return None;
        }

        let mut route = vec![goal];
        let mut cursor = goal;
        while let Some(prev) = via[cursor] {
            route.push(prev);
            cursor = prev;
        }
        route.reverse();
        Some((route, best[goal]))
    }

    /// Closest node on `floor` to (x, y), by squared Euclidean distance.
    ///
    /// Ties keep node declaration order.
    pub fn nearest_node(&self, x: f64, y: f64, floor: &str) -> Option<&GraphNode> {
        let mut best: Option<&GraphNode> = None;
        let mut best_d2 = f64::INFINITY;

        for node in self.graph.nodes.iter().filter(|n| n.floor == floor) {
            let dx = node.x - x;
            let dy = node.y - y;
            let d2 = dx * dx + dy * dy;
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(node);
            }
        }
        best
    }
}
