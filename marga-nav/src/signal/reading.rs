//! Raw RSSI readings from one scan cycle.

use serde::{Deserialize, Serialize};

/// RSSI value reported by the scanner when a source could not be ranged.
pub const INVALID_RSSI: i32 = 0;

/// One signal-strength sample for one transmitter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalReading {
    /// Source identifier, conventionally `uuid:major:minor`
    pub id: String,
    /// Received signal strength (dBm)
    pub rssi: i32,
    /// Capture time in milliseconds since the start of the recording
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl SignalReading {
    pub fn new(id: impl Into<String>, rssi: i32, timestamp_ms: u64) -> Self {
        Self {
            id: id.into(),
            rssi,
            timestamp_ms,
        }
    }

    /// False for the scanner's "no reading" sentinel.
    pub fn is_valid(&self) -> bool {
        self.rssi != INVALID_RSSI
    }

    /// Compact identifier for logs: `AAAAAAAA...1:2`.
    pub fn short_id(&self) -> String {
        let parts: Vec<&str> = self.id.split(':').collect();
        if parts.len() != 3 {
            return self.id.clone();
        }
        let uuid: String = parts[0].chars().take(8).collect();
        format!("{}...{}:{}", uuid, parts[1], parts[2])
    }
}

/// All readings captured in one scan cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanFrame {
    /// Milliseconds since the start of the recording
    pub timestamp_ms: u64,
    pub readings: Vec<SignalReading>,
}
