//! Exponential moving average over per-source RSSI.
//!
//! ```text
//! smoothed = α × raw + (1 - α) × previous
//! ```
//!
//! Higher α tracks changes faster but passes more noise through. The first
//! reading of a source seeds its state directly so there is no start-up lag.

use std::collections::BTreeMap;

/// Default smoothing factor.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Smoothed RSSI per source identifier.
///
/// Ordered so that downstream distance sums are reproducible.
pub type SmoothedVector = BTreeMap<String, f64>;

/// Per-source RSSI smoother.
///
/// Single writer: one stream of raw samples. The key set only grows during
/// a session.
#[derive(Clone, Debug)]
pub struct RssiSmoother {
    alpha: f64,
    state: SmoothedVector,
}

impl RssiSmoother {
    /// Create a smoother. `alpha` is clamped into (0, 1].
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(f64::MIN_POSITIVE, 1.0),
            state: BTreeMap::new(),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fold one raw reading into the source's state and return the new value.
    pub fn update(&mut self, id: &str, rssi: i32) -> f64 {
        let raw = f64::from(rssi);
        let smoothed = match self.state.get(id) {
            Some(&prev) => self.alpha * raw + (1.0 - self.alpha) * prev,
            None => raw,
        };
        self.state.insert(id.to_string(), smoothed);
        smoothed
    }

    /// Current smoothed value for one source.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.state.get(id).copied()
    }

    /// Smoothed values for every source seen so far.
    pub fn vector(&self) -> &SmoothedVector {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl Default for RssiSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
