use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_HIGH_SCORE_PATH, DROP_INTERVAL, LINE_CLEAR_DELAY, MIN_DROP_INTERVAL, SPEEDUP_AMOUNT,
    SPEEDUP_SCORE_STEP,
};
use crate::error::ConfigError;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub storage: StorageConfig,
}

/// Gravity and line-clear timing, all in milliseconds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub drop_interval_ms: u64,
    pub min_drop_interval_ms: u64,
    pub speedup_score_step: u32,
    pub speedup_ms: u64,
    pub line_clear_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            drop_interval_ms: DROP_INTERVAL,
            min_drop_interval_ms: MIN_DROP_INTERVAL,
            speedup_score_step: SPEEDUP_SCORE_STEP,
            speedup_ms: SPEEDUP_AMOUNT,
            line_clear_delay_ms: LINE_CLEAR_DELAY,
        }
    }
}

impl TimingConfig {
    pub fn line_clear_delay(&self) -> Duration {
        Duration::from_millis(self.line_clear_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where the high score is kept. `None` keeps it in memory only.
    pub high_score_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            high_score_path: Some(PathBuf::from(DEFAULT_HIGH_SCORE_PATH)),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        if timing.drop_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.drop_interval_ms must be > 0".into(),
            ));
        }
        if timing.min_drop_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.min_drop_interval_ms must be > 0".into(),
            ));
        }
        if timing.min_drop_interval_ms > timing.drop_interval_ms {
            return Err(ConfigError::Validation(
                "timing.min_drop_interval_ms must be <= timing.drop_interval_ms".into(),
            ));
        }
        if timing.speedup_score_step == 0 {
            return Err(ConfigError::Validation(
                "timing.speedup_score_step must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        AppConfig::default().validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[timing]
line_clear_delay_ms = 500
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timing.line_clear_delay_ms, 500);
        assert_eq!(config.timing.drop_interval_ms, 1000);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation_rejects_floor_above_base() {
        let mut config = AppConfig::default();
        config.timing.min_drop_interval_ms = 2000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_speedup_step() {
        let mut config = AppConfig::default();
        config.timing.speedup_score_step = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_blockfall.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockfall.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[timing]
drop_interval_ms = 800

[storage]
high_score_path = "scores/best.json"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.timing.drop_interval_ms, 800);
        assert_eq!(config.timing.min_drop_interval_ms, 100);
        assert_eq!(
            config.storage.high_score_path,
            Some(PathBuf::from("scores/best.json"))
        );
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockfall.toml");
        std::fs::write(&path, "[timing]\ndrop_interval_ms = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
