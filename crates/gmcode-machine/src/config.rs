//! Machine configuration
//!
//! Settings that shape the emitted program: numeric resolution, the
//! default blending tolerances written by the preamble, and the tool
//! loaded at program start. Stored as TOML or JSON.

use gmcode_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::modes::PathMode;

/// Emitter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Smallest distance the machine resolves; also sets decimal places
    pub accuracy: f64,
    /// `P` of the preamble's `G64`
    pub blend_tolerance: f64,
    /// `Q` of the preamble's `G64`
    pub naive_cam_tolerance: f64,
    /// Tool loaded by the preamble when a tool change is requested
    pub initial_tool: u32,
    /// Wrap the preamble in banner comments
    pub preamble_comments: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            accuracy: 1e-4,
            blend_tolerance: 0.05,
            naive_cam_tolerance: 0.05,
            initial_tool: 1,
            preamble_comments: true,
        }
    }
}

impl MachineConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Path mode selected by the standard preamble
    pub fn preamble_path_mode(&self) -> PathMode {
        PathMode::blend_within(self.blend_tolerance, self.naive_cam_tolerance)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.accuracy > 0.0 && self.accuracy <= 1.0) {
            return Err(out_of_range("accuracy", self.accuracy));
        }
        if !(self.blend_tolerance >= 0.0 && self.blend_tolerance.is_finite()) {
            return Err(out_of_range("blend_tolerance", self.blend_tolerance));
        }
        if !(self.naive_cam_tolerance >= 0.0 && self.naive_cam_tolerance.is_finite()) {
            return Err(out_of_range(
                "naive_cam_tolerance",
                self.naive_cam_tolerance,
            ));
        }
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn out_of_range(key: &str, value: f64) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = MachineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.preamble_path_mode(), PathMode::blend_within(0.05, 0.05));
    }

    #[test]
    fn test_validate_rejects_bad_accuracy() {
        for accuracy in [0.0, -1e-3, 2.0, f64::NAN] {
            let config = MachineConfig {
                accuracy,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ValueOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MachineConfig = toml::from_str("accuracy = 0.001\n").unwrap();
        assert_eq!(config.accuracy, 0.001);
        assert_eq!(config.blend_tolerance, 0.05);
        assert!(config.preamble_comments);
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("machine.toml");
        let config = MachineConfig {
            accuracy: 1e-3,
            initial_tool: 4,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(MachineConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("machine.json");
        let config = MachineConfig {
            preamble_comments: false,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(MachineConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("machine.yaml");
        assert!(matches!(
            MachineConfig::default().save_to_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
