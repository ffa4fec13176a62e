//! Application configuration
//!
//! Timing knobs for discovery, eviction and input debouncing. Defaults match
//! the values in [`crate::constants`]; an optional `config.toml` in the
//! platform config directory overrides them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::*;
use crate::error::{ConfigError, Result};
use crate::protocol::{PeerId, VehicleId};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vehicle: VehicleConfig,
    pub discovery: DiscoveryConfig,
    pub selection: SelectionConfig,
}

/// Which vehicle and component this manager tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// System id of the tracked vehicle
    pub system_id: VehicleId,
    /// Primary component id; heartbeats from it are never camera candidates
    pub primary_component: PeerId,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            system_id: 1,
            primary_component: 1,
        }
    }
}

/// Discovery retry and eviction timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Minimum silence before an info request is retried
    pub retry_after_ms: u64,
    /// Total info requests before a peer is given up on
    pub max_requests: u32,
    /// Heartbeat silence after which a confirmed camera is evicted
    pub stale_after_ms: u64,
    /// Period of the eviction sweep
    pub sweep_interval_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            retry_after_ms: INFO_RETRY_AFTER_MS,
            max_requests: MAX_INFO_REQUESTS,
            stale_after_ms: HEARTBEAT_STALE_AFTER_MS,
            sweep_interval_ms: SWEEP_INTERVAL_MS,
        }
    }
}

impl DiscoveryConfig {
    pub fn retry_after(&self) -> Duration {
        Duration::from_millis(self.retry_after_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

/// Input debounce windows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Debounce window for zoom stepping
    pub zoom_debounce_ms: u64,
    /// Debounce window shared by camera and stream stepping
    pub switch_debounce_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            zoom_debounce_ms: ZOOM_DEBOUNCE_MS,
            switch_debounce_ms: SWITCH_DEBOUNCE_MS,
        }
    }
}

impl SelectionConfig {
    pub fn zoom_debounce(&self) -> Duration {
        Duration::from_millis(self.zoom_debounce_ms)
    }

    pub fn switch_debounce(&self) -> Duration {
        Duration::from_millis(self.switch_debounce_ms)
    }
}

impl AppConfig {
    /// Load from the platform config directory, falling back to defaults
    /// when no file exists.
    pub fn load_or_default() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and parse a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "gcs", "camera-manager")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = AppConfig::default();
        assert_eq!(config.discovery.retry_after(), Duration::from_millis(2000));
        assert_eq!(config.discovery.max_requests, 4);
        assert_eq!(config.discovery.stale_after(), Duration::from_millis(5000));
        assert_eq!(config.selection.zoom_debounce(), Duration::from_millis(250));
        assert_eq!(
            config.selection.switch_debounce(),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_partial_toml_overrides() {
        let text = r#"
            [discovery]
            stale_after_ms = 8000

            [vehicle]
            system_id = 7
        "#;
        let config: AppConfig = toml::from_str(text).unwrap();
        assert_eq!(config.discovery.stale_after_ms, 8000);
        assert_eq!(config.discovery.retry_after_ms, 2000);
        assert_eq!(config.vehicle.system_id, 7);
        assert_eq!(config.vehicle.primary_component, 1);
    }
}
