//! End-to-end pipeline: readings -> smoother -> k-NN -> guidance.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::NavError;
use crate::guidance::{DebugSnapshot, GuidanceEvent, GuidanceSession};
use crate::positioning::{FingerprintTable, KnnPositioner, PositionEstimate};
use crate::signal::{RssiSmoother, ScanFrame, SignalReading, SmoothedVector};

/// Drives one guidance session from raw scan cycles.
///
/// Owns the single-writer smoother; the fingerprint table is shared
/// read-only.
pub struct Navigator {
    smoother: RssiSmoother,
    positioner: KnnPositioner,
    fingerprints: Arc<FingerprintTable>,
    session: GuidanceSession,
    last_estimate: Option<PositionEstimate>,
}

impl Navigator {
    pub fn new(
        smoother: RssiSmoother,
        positioner: KnnPositioner,
        fingerprints: Arc<FingerprintTable>,
        session: GuidanceSession,
    ) -> Self {
        Self {
            smoother,
            positioner,
            fingerprints,
            session,
            last_estimate: None,
        }
    }

    /// Announce the route and (with autostart) begin guidance.
    pub fn begin(&mut self) -> Vec<GuidanceEvent> {
        self.session.begin()
    }

    /// Process one scan cycle.
    ///
    /// Sentinel readings are dropped before smoothing. The estimate uses the
    /// full smoothed vector, including sources missing from this scan.
    pub fn process_scan(&mut self, readings: &[SignalReading], now: Instant) -> Vec<GuidanceEvent> {
        let mut valid = 0usize;
        for reading in readings.iter().filter(|r| r.is_valid()) {
            self.smoother.update(&reading.id, reading.rssi);
            valid += 1;
        }

        if valid == 0 {
            tracing::debug!("Scan with no valid readings ({} total)", readings.len());
            return vec![GuidanceEvent::NoEstimate(NavError::NoEstimateAvailable)];
        }

        let Some(estimate) = self
            .positioner
            .estimate(self.smoother.vector(), &self.fingerprints)
        else {
            tracing::debug!("No estimate: fingerprint table is empty");
            return vec![GuidanceEvent::NoEstimate(NavError::NoEstimateAvailable)];
        };

        let events = self.session.advance(&estimate, now);
        self.last_estimate = Some(estimate);
        events
    }

    /// Catch up after a stall.
    ///
    /// Only the most recent frame is processed; older queued frames are
    /// dropped. Frame timestamps are offsets from `epoch`.
    pub fn process_backlog(&mut self, frames: &[ScanFrame], epoch: Instant) -> Vec<GuidanceEvent> {
        let Some(latest) = frames.iter().max_by_key(|f| f.timestamp_ms) else {
            return Vec::new();
        };
        if frames.len() > 1 {
            tracing::debug!("Coalescing {} queued scan frames", frames.len());
        }
        let now = epoch + Duration::from_millis(latest.timestamp_ms);
        self.process_scan(&latest.readings, now)
    }

    pub fn smoothed_vector(&self) -> &SmoothedVector {
        self.smoother.vector()
    }

    pub fn last_estimate(&self) -> Option<&PositionEstimate> {
        self.last_estimate.as_ref()
    }

    pub fn session(&self) -> &GuidanceSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GuidanceSession {
        &mut self.session
    }

    pub fn snapshot(&self) -> Option<&DebugSnapshot> {
        self.session.snapshot()
    }
}
