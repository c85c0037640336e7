//! Human-facing place names and route-request policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MargaError, Result};

/// Metadata for one selectable place (keyed by graph node id).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceInfo {
    pub name: String,
    pub category: String,
    #[serde(default = "default_allowed")]
    pub start_allowed: bool,
    #[serde(default = "default_allowed")]
    pub dest_allowed: bool,
}

fn default_allowed() -> bool {
    true
}

impl PlaceInfo {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            start_allowed: true,
            dest_allowed: true,
        }
    }
}

/// Node id -> place metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceCatalog {
    places: BTreeMap<String, PlaceInfo>,
}

impl PlaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, info: PlaceInfo) {
        self.places.insert(id.into(), info);
    }

    pub fn get(&self, id: &str) -> Option<&PlaceInfo> {
        self.places.get(id)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Place name for display, falling back to the node id.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.places.get(id).map_or(id, |p| p.name.as_str())
    }

    /// Places that may be chosen as a route start.
    pub fn starts(&self) -> impl Iterator<Item = (&str, &PlaceInfo)> {
        self.places
            .iter()
            .filter(|(_, p)| p.start_allowed)
            .map(|(id, p)| (id.as_str(), p))
    }

    /// Places that may be chosen as a destination.
    pub fn destinations(&self) -> impl Iterator<Item = (&str, &PlaceInfo)> {
        self.places
            .iter()
            .filter(|(_, p)| p.dest_allowed)
            .map(|(id, p)| (id.as_str(), p))
    }

    /// Reject route requests the selection screen would not offer.
    ///
    /// An empty catalog only enforces `start != goal`.
    pub fn validate_request(&self, start: &str, goal: &str) -> Result<()> {
        if start == goal {
            return Err(MargaError::InvalidRequest(format!(
                "start and destination are both {}",
                start
            )));
        }
        if self.places.is_empty() {
            return Ok(());
        }

        match self.places.get(start) {
            None => {
                return Err(MargaError::InvalidRequest(format!(
                    "unknown start place {}",
                    start
                )));
            }
            Some(p) if !p.start_allowed => {
                return Err(MargaError::InvalidRequest(format!(
                    "{} cannot be used as a start",
                    p.name
                )));
            }
            Some(_) => {}
        }

        match self.places.get(goal) {
            None => Err(MargaError::InvalidRequest(format!(
                "unknown destination {}",
                goal
            ))),
            Some(p) if !p.dest_allowed => Err(MargaError::InvalidRequest(format!(
                "{} cannot be used as a destination",
                p.name
            ))),
            Some(_) => Ok(()),
        }
    }
}
