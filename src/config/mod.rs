//! Configuration management
//!
//! Loads, validates and saves the surface core's settings from TOML. Every
//! section and field falls back to its default, so a partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::input::TopMarginPolicy;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RemoteWindowConfig {
    /// Host window settings
    #[serde(default)]
    pub window: WindowConfig,

    /// Overlay stacking
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Pointer input forwarding
    #[serde(default)]
    pub input: InputConfig,

    /// Headless host used by the replay tool
    #[serde(default)]
    pub headless: HeadlessConfig,

    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Class name handed to the host when a window is configured
    pub class_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Stacking order of overlay surfaces; the primary surface is 0
    pub z_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct InputConfig {
    /// "bind" captures the chrome height once, "per-event" re-measures it
    pub top_margin_policy: TopMarginPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Title bar height of the headless host (pixels)
    pub top_margin: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            class_name: "RemoteWindow".to_string(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { z_index: 10 }
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self { top_margin: 32 }
    }
}

impl RemoteWindowConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Expand ~ to home directory
        let expanded_path = if path.to_string_lossy().starts_with('~') {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            let rest = path.strip_prefix("~").unwrap_or(path);
            Path::new(&home).join(rest)
        } else {
            path.to_path_buf()
        };

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: RemoteWindowConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.window.class_name.trim().is_empty() {
            anyhow::bail!("Invalid window.class_name: must not be empty");
        }

        // Overlays must stack above the primary surface
        if self.overlay.z_index < 1 {
            anyhow::bail!(
                "Invalid overlay.z_index {}: must be at least 1",
                self.overlay.z_index
            );
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }
}
