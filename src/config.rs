use crate::error::TypeaheadError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Tuning knobs of a search session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quiet period after the last keystroke before a query is evaluated.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Number of distinct queries kept in the result cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Result count requested from the provider per lookup.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_debounce_ms() -> u64 {
    1000
}
fn default_cache_capacity() -> usize {
    10
}
fn default_max_results() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            cache_capacity: default_cache_capacity(),
            max_results: default_max_results(),
        }
    }
}

impl EngineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Checked cache capacity; zero is a configuration error.
    pub fn capacity(&self) -> crate::error::Result<NonZeroUsize> {
        NonZeroUsize::new(self.cache_capacity).ok_or_else(|| {
            TypeaheadError::Config("cache_capacity must be greater than zero".to_string())
        })
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.capacity()?;
        if self.max_results == 0 {
            return Err(TypeaheadError::Config(
                "max_results must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::find_config_path()? {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    fn find_config_path() -> Result<Option<PathBuf>> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("typeahead/config.toml");
            if xdg_path.exists() {
                return Ok(Some(xdg_path));
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".typeahead.toml");
            if home_path.exists() {
                return Ok(Some(home_path));
            }
        }

        let current_path = Path::new(".typeahead.toml");
        if current_path.exists() {
            return Ok(Some(current_path.to_path_buf()));
        }

        Ok(None)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.engine.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = Config::default();
        assert_eq!(config.engine.debounce(), Duration::from_millis(1000));
        assert_eq!(config.engine.cache_capacity, 10);
        assert_eq!(config.engine.max_results, 10);
        assert!(config.provider.catalog.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config: Config = toml::from_str("[engine]\ndebounce_ms = 250\n").unwrap();
        assert_eq!(config.engine.debounce_ms, 250);
        assert_eq!(config.engine.cache_capacity, 10);
        assert_eq!(config.provider.latency_ms, 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let engine = EngineConfig {
            cache_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(engine.validate(), Err(TypeaheadError::Config(_))));
    }

    #[test]
    fn zero_max_results_is_rejected() {
        let engine = EngineConfig {
            max_results: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(engine.validate(), Err(TypeaheadError::Config(_))));
    }

    #[test]
    fn save_then_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.engine.cache_capacity = 3;
        config.provider.catalog = Some(PathBuf::from("products.json"));
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
