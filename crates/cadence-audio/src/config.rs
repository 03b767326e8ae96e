use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::file::ResourcePath;

pub const CONFIG_FILE: &str = "audio.json";

/// Which backend the engine should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendSelection {
    /// First provider that starts successfully, else the dummy backend.
    #[default]
    Auto,
    /// Never produce sound.
    Dummy,
    /// Kira playback (requires the `kira` feature).
    Kira,
}

impl BackendSelection {
    /// Provider name this selection pins, `None` for discovery.
    pub fn provider_name(self) -> Option<&'static str> {
        match self {
            BackendSelection::Auto => None,
            BackendSelection::Dummy => Some(crate::backend::dummy::PROVIDER_NAME),
            BackendSelection::Kira => Some("kira"),
        }
    }
}

/// Audio engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub backend: BackendSelection,
    /// Locations registered with the backend at startup.
    pub resource_paths: Vec<ResourcePath>,
    /// Gain applied to every created source (0.0 - 1.0).
    pub master_gain: f32,
    /// Upper bound on playlist advances handled in one `update`.
    pub max_advances_per_update: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            backend: BackendSelection::Auto,
            resource_paths: Vec::new(),
            master_gain: 1.0,
            max_advances_per_update: 64,
        }
    }
}

impl AudioConfig {
    /// Loads config from the default config file.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read audio config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse audio config: {}", path.display()))?;
        Ok(config)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// `master_gain` clamped to the valid range.
    pub fn effective_gain(&self) -> f32 {
        if self.master_gain.is_nan() {
            1.0
        } else {
            self.master_gain.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AudioConfig::default();
        assert_eq!(config.backend, BackendSelection::Auto);
        assert!(config.resource_paths.is_empty());
        assert!((config.master_gain - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.max_advances_per_update, 64);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempdir().unwrap();
        let config = AudioConfig::load_from(dir.path().join("missing.json")).unwrap();
        assert_eq!(config, AudioConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audio.json");

        let config = AudioConfig {
            backend: BackendSelection::Dummy,
            resource_paths: vec![ResourcePath::file("assets/music"), ResourcePath::vfs("sfx.pak")],
            master_gain: 0.25,
            max_advances_per_update: 8,
        };
        config.save_to(&path).unwrap();

        let loaded = AudioConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AudioConfig = serde_json::from_str(r#"{"backend":"kira"}"#).unwrap();
        assert_eq!(config.backend, BackendSelection::Kira);
        assert_eq!(config.max_advances_per_update, 64);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audio.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AudioConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_effective_gain_is_clamped() {
        let mut config = AudioConfig {
            master_gain: 3.0,
            ..Default::default()
        };
        assert!((config.effective_gain() - 1.0).abs() < f32::EPSILON);
        config.master_gain = -1.0;
        assert_eq!(config.effective_gain(), 0.0);
    }
}
