//! Fingerprint-based position estimation.
//!
//! This module provides:
//! - Fingerprint records and the immutable fingerprint table
//! - k-nearest-neighbour lookup from a smoothed RSSI vector

mod fingerprint;
mod knn;

pub use fingerprint::{FingerprintLocation, FingerprintRecord, FingerprintTable};
pub use knn::{KnnPositioner, MISSING_RSSI, PositionEstimate, fingerprint_distance};
