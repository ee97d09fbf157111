//! Post-processor configuration
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files; the default location is platform specific.
//!
//! Configuration is organized into sections:
//! - Output formatting (sequence numbers, word separation, precision)
//! - Tool change and probing behaviour
//! - Router dial calibration
//! - Operator prompt templates

use crate::error::{ConfigError, SettingsError, SettingsResult};
use crate::prompts::PromptTemplates;
use crate::router::RouterSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_DECIMALS: u8 = 6;

/// Dwell times are clamped to at least 0.001 s, which needs three decimals
pub const MIN_DWELL_DECIMALS: u8 = 3;

/// Output formatting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Prefix blocks with N sequence numbers
    pub sequence_numbers: bool,
    /// First sequence number
    pub sequence_start: u32,
    /// Sequence number increment
    pub sequence_increment: u32,
    /// Separate words with a space
    pub separate_words: bool,
    /// Emit a comment whenever the movement type changes
    pub movement_comments: bool,
    /// Decimals for X/Y/Z/I/J
    pub xyz_decimals: u8,
    /// Decimals for feed rates
    pub feed_decimals: u8,
    /// Decimals for dwell times in seconds
    pub dwell_decimals: u8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            sequence_numbers: false,
            sequence_start: 10,
            sequence_increment: 1,
            separate_words: true,
            movement_comments: true,
            xyz_decimals: 3,
            feed_decimals: 0,
            dwell_decimals: 3,
        }
    }
}

/// Manual tool change and probing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolChangeSettings {
    /// Emit the operator tool change sequence
    pub prompts_enabled: bool,
    /// A touch probe is used to set Z zero after each tool change
    pub probing_tool: bool,
    /// Touch plate thickness in mm
    pub probe_plate_thickness: f64,
    /// Probing feed rate in mm/min
    pub probe_feed: f64,
    /// Distance kept below the top of Z travel when raising, in mm
    pub safety_margin: f64,
}

impl Default for ToolChangeSettings {
    fn default() -> Self {
        Self {
            prompts_enabled: true,
            probing_tool: true,
            probe_plate_thickness: 0.5,
            probe_feed: 100.0,
            safety_margin: 1.0,
        }
    }
}

/// Complete post-processor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PostConfig {
    /// Output formatting
    pub output: OutputSettings,
    /// Tool change and probing
    pub tool_change: ToolChangeSettings,
    /// Router dial calibration
    pub router: RouterSettings,
    /// Operator prompt templates
    pub prompts: PromptTemplates,
}

impl PostConfig {
    /// Default config file location (`<config dir>/millpost/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform("no user configuration directory".to_string())
        })?;
        Ok(dir.join("millpost").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded post configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let output = &self.output;
        if output.sequence_increment == 0 {
            return Err(SettingsError::invalid("output.sequence_increment", "must be at least 1"));
        }
        for (key, decimals) in [
            ("output.xyz_decimals", output.xyz_decimals),
            ("output.feed_decimals", output.feed_decimals),
            ("output.dwell_decimals", output.dwell_decimals),
        ] {
            if decimals > MAX_DECIMALS {
                return Err(SettingsError::invalid(key, format!("must be at most {MAX_DECIMALS}")));
            }
        }
        if output.dwell_decimals < MIN_DWELL_DECIMALS {
            return Err(SettingsError::invalid(
                "output.dwell_decimals",
                format!("must be at least {MIN_DWELL_DECIMALS}"),
            ));
        }

        let tool_change = &self.tool_change;
        if tool_change.probe_feed.is_nan() || tool_change.probe_feed <= 0.0 {
            return Err(SettingsError::invalid("tool_change.probe_feed", "must be > 0"));
        }
        if tool_change.safety_margin.is_nan() || tool_change.safety_margin < 0.0 {
            return Err(SettingsError::invalid("tool_change.safety_margin", "must be >= 0"));
        }
        let thickness = tool_change.probe_plate_thickness;
        if thickness.is_nan() || thickness < 0.0 {
            return Err(SettingsError::invalid(
                "tool_change.probe_plate_thickness",
                "must be >= 0",
            ));
        }

        self.router.validate()
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouterModel;

    #[test]
    fn test_defaults_are_valid() {
        let config = PostConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.output.sequence_numbers);
        assert_eq!(config.output.sequence_start, 10);
        assert!(config.tool_change.prompts_enabled);
        assert_eq!(config.router.model, RouterModel::None);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = PostConfig::default();
        config.output.sequence_increment = 0;
        assert!(config.validate().is_err());

        let mut config = PostConfig::default();
        config.output.xyz_decimals = 9;
        assert!(config.validate().is_err());

        let mut config = PostConfig::default();
        config.tool_change.probe_feed = 0.0;
        assert!(config.validate().is_err());

        let mut config = PostConfig::default();
        config.tool_change.safety_margin = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PostConfig::default();
        config.router.model = RouterModel::Custom;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dwell_decimals_cover_minimum_dwell() {
        let mut config = PostConfig::default();
        config.output.dwell_decimals = 0;
        match config.validate() {
            Err(SettingsError::InvalidSetting { key, .. }) => {
                assert_eq!(key, "output.dwell_decimals")
            }
            other => panic!("unexpected result: {other:?}"),
        }

        config.output.dwell_decimals = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: PostConfig = toml::from_str(
            r#"
            [output]
            sequence_numbers = true

            [router]
            model = "dewalt_dwp611"
            "#,
        )
        .unwrap();
        assert!(config.output.sequence_numbers);
        assert_eq!(config.output.sequence_increment, 1);
        assert_eq!(config.router.model, RouterModel::DewaltDwp611);
        assert!(config.tool_change.probing_tool);
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post").join("config.toml");

        let mut config = PostConfig::default();
        config.output.separate_words = false;
        config.tool_change.probing_tool = false;
        config.router.model = RouterModel::MakitaRt0701c;
        config.save_to_file(&path).unwrap();

        let loaded = PostConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PostConfig::default();
        config.output.sequence_numbers = true;
        config.output.sequence_start = 100;
        config.output.sequence_increment = 5;
        config.save_to_file(&path).unwrap();

        let loaded = PostConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.output.sequence_start, 100);
        assert_eq!(loaded.output.sequence_increment, 5);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "output: {}").unwrap();
        let err = PostConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nsequence_increment = 0\n").unwrap();
        let err = PostConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidSetting { .. }));
    }
}
