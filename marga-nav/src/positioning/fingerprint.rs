//! Reference fingerprints surveyed at known locations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Surveyed location of a fingerprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FingerprintLocation {
    pub x: f64,
    pub y: f64,
    pub floor: String,
}

/// Expected RSSI profile at one location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    #[serde(rename = "loc")]
    pub location: FingerprintLocation,
    /// Expected RSSI (dBm) per source identifier
    pub rssi: BTreeMap<String, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FingerprintRecord {
    pub fn new(x: f64, y: f64, floor: impl Into<String>) -> Self {
        Self {
            location: FingerprintLocation {
                x,
                y,
                floor: floor.into(),
            },
            rssi: BTreeMap::new(),
            label: None,
        }
    }

    /// Builder-style helper for tests and fixtures.
    pub fn with_rssi(mut self, id: impl Into<String>, rssi: i32) -> Self {
        self.rssi.insert(id.into(), rssi);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Ordered, read-only fingerprint table.
///
/// Record order matters: it breaks distance ties during estimation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintTable {
    records: Vec<FingerprintRecord>,
}

impl FingerprintTable {
    pub fn new(records: Vec<FingerprintRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FingerprintRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Floors covered by the survey, in first-seen order.
    pub fn floors(&self) -> Vec<&str> {
        let mut floors: Vec<&str> = Vec::new();
        for r in &self.records {
            if !floors.contains(&r.location.floor.as_str()) {
                floors.push(&r.location.floor);
            }
        }
        floors
    }
}

impl From<Vec<FingerprintRecord>> for FingerprintTable {
    fn from(records: Vec<FingerprintRecord>) -> Self {
        Self::new(records)
    }
}
