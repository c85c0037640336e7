//! Configuration loading for MargaNav

use crate::error::{MargaError, Result};
use crate::guidance::GuidanceConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub positioning: PositioningConfig,
    #[serde(default)]
    pub guidance: GuidanceSection,
    #[serde(default)]
    pub data: DataConfig,
}

/// RSSI smoothing settings
#[derive(Clone, Debug, Deserialize)]
pub struct SmoothingConfig {
    /// EMA weight of the newest sample, in (0, 1] (default: 0.3)
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

/// Fingerprint positioning settings
#[derive(Clone, Debug, Deserialize)]
pub struct PositioningConfig {
    /// Number of nearest fingerprints averaged (default: 1)
    #[serde(default = "default_k")]
    pub k: usize,
}

/// Guidance thresholds and cooldowns
#[derive(Clone, Debug, Deserialize)]
pub struct GuidanceSection {
    /// Distance to a node that counts as reached (default: 1.5)
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f64,

    /// Lateral deviation from the segment that counts as off-route (default: 3.0)
    #[serde(default = "default_off_route_threshold")]
    pub off_route_threshold: f64,

    /// Consecutive off-route updates before warning (default: 3)
    #[serde(default = "default_off_route_confirm_count")]
    pub off_route_confirm_count: u32,

    /// Minimum time between off-route warnings (seconds)
    #[serde(default = "default_off_route_cooldown_secs")]
    pub off_route_cooldown_secs: f64,

    /// Minimum time between floor-change reminders (seconds)
    #[serde(default = "default_floor_announce_cooldown_secs")]
    pub floor_announce_cooldown_secs: f64,

    /// Minimum time between spoken progress updates (seconds)
    #[serde(default = "default_progress_announce_cooldown_secs")]
    pub progress_announce_cooldown_secs: f64,

    /// Recompute the route after a confirmed off-route warning
    #[serde(default = "default_true")]
    pub auto_reroute: bool,

    /// Start guidance immediately after the route is announced
    #[serde(default = "default_true")]
    pub autostart: bool,
}

/// Building data location
#[derive(Clone, Debug, Deserialize)]
pub struct DataConfig {
    /// Directory holding the building files
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_graph_file")]
    pub graph_file: String,

    #[serde(default = "default_fingerprints_file")]
    pub fingerprints_file: String,

    /// Optional; a missing file yields an empty catalog
    #[serde(default = "default_places_file")]
    pub places_file: String,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

impl Default for GuidanceSection {
    fn default() -> Self {
        Self {
            arrival_threshold: default_arrival_threshold(),
            off_route_threshold: default_off_route_threshold(),
            off_route_confirm_count: default_off_route_confirm_count(),
            off_route_cooldown_secs: default_off_route_cooldown_secs(),
            floor_announce_cooldown_secs: default_floor_announce_cooldown_secs(),
            progress_announce_cooldown_secs: default_progress_announce_cooldown_secs(),
            auto_reroute: default_true(),
            autostart: default_true(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            graph_file: default_graph_file(),
            fingerprints_file: default_fingerprints_file(),
            places_file: default_places_file(),
        }
    }
}

// Default value functions
fn default_alpha() -> f64 {
    0.3
}
fn default_k() -> usize {
    1
}
fn default_arrival_threshold() -> f64 {
    1.5
}
fn default_off_route_threshold() -> f64 {
    3.0
}
fn default_off_route_confirm_count() -> u32 {
    3
}
fn default_off_route_cooldown_secs() -> f64 {
    8.0
}
fn default_floor_announce_cooldown_secs() -> f64 {
    6.0
}
fn default_progress_announce_cooldown_secs() -> f64 {
    3.0
}
fn default_true() -> bool {
    true
}

// Data defaults
fn default_data_dir() -> PathBuf {
    PathBuf::from("data/sample")
}
fn default_graph_file() -> String {
    "graph.json".to_string()
}
fn default_fingerprints_file() -> String {
    "fingerprints.json".to_string()
}
fn default_places_file() -> String {
    "places.json".to_string()
}

impl GuidanceSection {
    /// Runtime guidance settings.
    ///
    /// Call after [`MargaConfig::validate`]; negative cooldowns would not
    /// convert.
    pub fn to_guidance_config(&self) -> GuidanceConfig {
        GuidanceConfig {
            arrival_threshold: self.arrival_threshold,
            off_route_threshold: self.off_route_threshold,
            off_route_confirm_count: self.off_route_confirm_count,
            off_route_cooldown: secs(self.off_route_cooldown_secs),
            floor_announce_cooldown: secs(self.floor_announce_cooldown_secs),
            progress_announce_cooldown: secs(self.progress_announce_cooldown_secs),
            auto_reroute: self.auto_reroute,
            autostart: self.autostart,
        }
    }
}

fn secs(s: f64) -> Duration {
    Duration::try_from_secs_f64(s).unwrap_or_default()
}

impl DataConfig {
    pub fn graph_path(&self) -> PathBuf {
        self.dir.join(&self.graph_file)
    }

    pub fn fingerprints_path(&self) -> PathBuf {
        self.dir.join(&self.fingerprints_file)
    }

    pub fn places_path(&self) -> PathBuf {
        self.dir.join(&self.places_file)
    }
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: MargaConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let alpha = self.smoothing.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(MargaError::Config(format!(
                "smoothing.alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        if self.positioning.k == 0 {
            return Err(MargaError::Config("positioning.k must be at least 1".into()));
        }

        let g = &self.guidance;
        let non_negative = [
            ("arrival_threshold", g.arrival_threshold),
            ("off_route_threshold", g.off_route_threshold),
            ("off_route_cooldown_secs", g.off_route_cooldown_secs),
            ("floor_announce_cooldown_secs", g.floor_announce_cooldown_secs),
            ("progress_announce_cooldown_secs", g.progress_announce_cooldown_secs),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(MargaError::Config(format!(
                    "guidance.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if g.off_route_confirm_count == 0 {
            return Err(MargaError::Config(
                "guidance.off_route_confirm_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_guidance_defaults() {
        let config = MargaConfig::default();
        assert!(config.validate().is_ok());

        let runtime = config.guidance.to_guidance_config();
        let expected = GuidanceConfig::default();
        assert_eq!(runtime.arrival_threshold, expected.arrival_threshold);
        assert_eq!(runtime.off_route_cooldown, expected.off_route_cooldown);
        assert_eq!(runtime.floor_announce_cooldown, expected.floor_announce_cooldown);
        assert_eq!(
            runtime.progress_announce_cooldown,
            expected.progress_announce_cooldown
        );
        assert_eq!(runtime.off_route_confirm_count, 3);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MargaConfig = toml::from_str(
            r#"
            [guidance]
            off_route_threshold = 4.5
            auto_reroute = false

            [data]
            dir = "/srv/building"
            "#,
        )
        .unwrap();

        assert_eq!(config.smoothing.alpha, 0.3);
        assert_eq!(config.positioning.k, 1);
        assert_eq!(config.guidance.off_route_threshold, 4.5);
        assert!(!config.guidance.auto_reroute);
        assert!(config.guidance.autostart);
        assert_eq!(
            config.data.graph_path(),
            PathBuf::from("/srv/building/graph.json")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[smoothing]\nalpha = 0.5\n\n[positioning]\nk = 3").unwrap();

        let config = MargaConfig::load(file.path()).unwrap();
        assert_eq!(config.smoothing.alpha, 0.5);
        assert_eq!(config.positioning.k, 3);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[smoothing]\nalpha = 1.5").unwrap();
        assert!(matches!(
            MargaConfig::load(file.path()),
            Err(MargaError::Config(_))
        ));

        let mut config = MargaConfig::default();
        config.positioning.k = 0;
        assert!(config.validate().is_err());

        let mut config = MargaConfig::default();
        config.guidance.off_route_cooldown_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = MargaConfig::default();
        config.guidance.off_route_confirm_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = MargaConfig::load(Path::new("/nonexistent/marga.toml"));
        assert!(matches!(result, Err(MargaError::Config(_))));
    }
}
