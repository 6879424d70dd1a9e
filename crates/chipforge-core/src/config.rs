//! Engine configuration, loadable from TOML or JSON.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported config format: {file}")]
    UnsupportedFormat { file: PathBuf },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// EngineConfig
// ===========================================================================

/// Tunables for the [`Game`](crate::engine::Game) store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How often the host should call `tick`.
    pub tick_interval_ms: u64,
    /// Ticks closer together than this are skipped.
    pub min_tick_secs: f64,
    /// Absences longer than this produce an offline summary on resume.
    pub offline_threshold_secs: f64,
    pub autosave_interval_secs: f64,
    /// Storage key the save document is written under.
    pub save_key: String,
    /// Manual mining power of a fresh game.
    pub starting_mining_power: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            min_tick_secs: 0.1,
            offline_threshold_secs: 60.0,
            autosave_interval_secs: 30.0,
            save_key: "chipforge-save".to_string(),
            starting_mining_power: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let parse: fn(&str) -> Result<Self, ConfigError> =
            match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => Self::from_toml_str,
                Some("json") => Self::from_json_str,
                _ => {
                    return Err(ConfigError::UnsupportedFormat {
                        file: path.to_path_buf(),
                    });
                }
            };
        let content = std::fs::read_to_string(path)?;
        parse(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_interval_ms",
                reason: "must be positive",
            });
        }
        let non_negative = [
            ("min_tick_secs", self.min_tick_secs),
            ("offline_threshold_secs", self.offline_threshold_secs),
            ("autosave_interval_secs", self.autosave_interval_secs),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite non-negative number",
                });
            }
        }
        if !(self.starting_mining_power.is_finite() && self.starting_mining_power > 0.0) {
            return Err(ConfigError::Invalid {
                field: "starting_mining_power",
                reason: "must be a finite positive number",
            });
        }
        if self.save_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "save_key",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.min_tick_secs, 0.1);
        assert_eq!(config.offline_threshold_secs, 60.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            offline_threshold_secs = 300.0
            save_key = "slot-2"
            "#,
        )
        .unwrap();
        assert_eq!(config.offline_threshold_secs, 300.0);
        assert_eq!(config.save_key, "slot-2");
        assert_eq!(config.autosave_interval_secs, 30.0);
    }

    #[test]
    fn json_config() {
        let config = EngineConfig::from_json_str(r#"{ "starting_mining_power": 4.0 }"#).unwrap();
        assert_eq!(config.starting_mining_power, 4.0);
        assert_eq!(config.tick_interval_ms, 100);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = EngineConfig::from_toml_str("starting_mining_power = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "starting_mining_power",
                ..
            }
        ));
        assert!(EngineConfig::from_toml_str("tick_interval_ms = 0").is_err());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            EngineConfig::from_toml_str("min_tick_secs = \"soon\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn unknown_extension() {
        let err = EngineConfig::load(Path::new("engine.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }
}
