use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{
    FULLSCREEN_CONFIRM_DELAY, HIDE_CONTROLS_DELAY, LOW_VOLUME_THRESHOLD, PROBE_TIMEOUT,
    SEEK_STEP_SECS,
};

/// Static configuration of a player instance.
///
/// Loaded once when the control surface attaches. Nothing here is written
/// back: user choices made through the settings panel live only as long as
/// the page does.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub controls: ControlsConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,

    #[serde(default = "default_fullscreen_confirm_ms")]
    pub fullscreen_confirm_ms: u64,

    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_speeds")]
    pub speeds: Vec<f64>,

    #[serde(default = "default_qualities")]
    pub qualities: Vec<String>,

    #[serde(default = "default_quality")]
    pub default_quality: String,

    #[serde(default = "default_low_volume_threshold")]
    pub low_volume_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse player config")?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            Self::from_toml_str(&contents)
        } else {
            info!("No config file at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}

impl ControlsConfig {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn fullscreen_confirm_delay(&self) -> Duration {
        Duration::from_millis(self.fullscreen_confirm_ms)
    }
}

impl NetworkConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: default_hide_delay_ms(),
            fullscreen_confirm_ms: default_fullscreen_confirm_ms(),
            seek_step_secs: default_seek_step(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speeds: default_speeds(),
            qualities: default_qualities(),
            default_quality: default_quality(),
            low_volume_threshold: default_low_volume_threshold(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

// Default value functions
fn default_hide_delay_ms() -> u64 { HIDE_CONTROLS_DELAY.as_millis() as u64 }
fn default_fullscreen_confirm_ms() -> u64 { FULLSCREEN_CONFIRM_DELAY.as_millis() as u64 }
fn default_seek_step() -> f64 { SEEK_STEP_SECS }
fn default_speeds() -> Vec<f64> { vec![0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0] }
fn default_qualities() -> Vec<String> {
    ["144", "240", "360", "480", "720", "1080"]
        .iter()
        .map(|q| q.to_string())
        .collect()
}
fn default_quality() -> String { "360".to_string() }
fn default_low_volume_threshold() -> f64 { LOW_VOLUME_THRESHOLD }
fn default_probe_timeout() -> u64 { PROBE_TIMEOUT.as_secs() }
