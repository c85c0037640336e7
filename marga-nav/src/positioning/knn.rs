//! k-nearest-neighbour positioning against a fingerprint table.
//!
//! Distance between a live vector and a fingerprint is the L1 distance over
//! the union of source ids. A source missing on either side counts as
//! [`MISSING_RSSI`], so one-sided sources are penalised rather than ignored.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::signal::SmoothedVector;

use super::fingerprint::{FingerprintRecord, FingerprintTable};

/// RSSI assumed for a source not present on one side of the comparison.
pub const MISSING_RSSI: f64 = -100.0;

/// Best guess of the user's location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionEstimate {
    pub x: f64,
    pub y: f64,
    pub floor: String,
}

impl PositionEstimate {
    pub fn new(x: f64, y: f64, floor: impl Into<String>) -> Self {
        Self {
            x,
            y,
            floor: floor.into(),
        }
    }
}

/// L1 distance between a smoothed vector and a fingerprint profile.
pub fn fingerprint_distance(live: &SmoothedVector, record: &FingerprintRecord) -> f64 {
    let mut sum = 0.0;
    for (id, &value) in live {
        let expected = record.rssi.get(id).map_or(MISSING_RSSI, |&v| f64::from(v));
        sum += (value - expected).abs();
    }
    for (id, &expected) in &record.rssi {
        if !live.contains_key(id) {
            sum += (MISSING_RSSI - f64::from(expected)).abs();
        }
    }
    sum
}

/// k-NN position estimator.
#[derive(Clone, Copy, Debug)]
pub struct KnnPositioner {
    k: usize,
}

impl KnnPositioner {
    /// Create an estimator using the `k` closest fingerprints (at least one).
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1) }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Estimate position from a smoothed vector.
    ///
    /// x/y are averaged over the k closest records; the floor is taken from
    /// the single closest record. Ties keep table order. Returns `None` for an
    /// empty table.
    pub fn estimate(
        &self,
        live: &SmoothedVector,
        table: &FingerprintTable,
    ) -> Option<PositionEstimate> {
        if table.is_empty() {
            return None;
        }

        let mut ranked: Vec<(&FingerprintRecord, f64)> = table
            .records()
            .iter()
            .map(|r| (r, fingerprint_distance(live, r)))
            .collect();
        // Vec::sort_by is stable
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let top = &ranked[..self.k.min(ranked.len())];
        let n = top.len() as f64;
        let x = top.iter().map(|(r, _)| r.location.x).sum::<f64>() / n;
        let y = top.iter().map(|(r, _)| r.location.y).sum::<f64>() / n;
        let (closest, closest_dist) = top[0];

        tracing::trace!(
            "knn: closest={:?} d={:.1}, k={}, estimate=({:.2}, {:.2}, {})",
            closest.label,
            closest_dist,
            top.len(),
            x,
            y,
            closest.location.floor
        );

        Some(PositionEstimate {
            x,
            y,
            floor: closest.location.floor.clone(),
        })
    }
}

impl Default for KnnPositioner {
    fn default() -> Self {
        Self::new(1)
    }
}
