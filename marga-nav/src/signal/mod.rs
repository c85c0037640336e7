//! Signal-strength input handling.
//!
//! This module provides:
//! - Scan readings as delivered by the scanning collaborator
//! - Per-source exponential smoothing of RSSI values

mod reading;
mod smoother;

pub use reading::{INVALID_RSSI, ScanFrame, SignalReading};
pub use smoother::{DEFAULT_ALPHA, RssiSmoother, SmoothedVector};
