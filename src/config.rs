//! Engine configuration.
//!
//! Configuration is optional TOML. Every field has a default, so an empty
//! file (or no file at all) yields [`EngineConfig::default`].
//!
//! ```toml
//! [compression]
//! mode = "reference"
//!
//! [ppm]
//! transpose_on_read = true
//!
//! [script]
//! stop_on_error = false
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "PRISM_CONFIG";

/// Complete configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub compression: CompressionOptions,
    pub ppm: PpmOptions,
    pub script: ScriptOptions,
}

/// How `compress` picks its threshold and which coefficients survive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    /// Threshold at the caller's percentile over the full padded square.
    #[default]
    Percentile,
    /// Threshold fixed at the 90th percentile; coefficients outside the
    /// W×H window are discarded before the inverse pass.
    Reference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionOptions {
    pub mode: CompressionMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PpmOptions {
    /// Store sample (row r, col c) at (row c, col r) when reading.
    pub transpose_on_read: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    /// Abort a script at the first failing command.
    pub stop_on_error: bool,
}

impl EngineConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration source and load it.
    ///
    /// An explicit path wins, then `PRISM_CONFIG`, then defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match config_source(explicit, std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn config_source(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| from_env.filter(|p| !p.as_os_str().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_parse_sections() {
        let config = EngineConfig::from_toml_str(
            r#"
            [compression]
            mode = "reference"

            [ppm]
            transpose_on_read = true
            "#,
        )
        .unwrap();

        assert_eq!(config.compression.mode, CompressionMode::Reference);
        assert!(config.ppm.transpose_on_read);
        assert!(!config.script.stop_on_error);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result = EngineConfig::from_toml_str("[compression]\nmode = \"lossless\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[script]\nstop_on_error = true").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(config.script.stop_on_error);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_source_precedence() {
        let explicit = PathBuf::from("cli.toml");
        let env = PathBuf::from("env.toml");

        assert_eq!(
            config_source(Some(&explicit), Some(env.clone())),
            Some(explicit.clone())
        );
        assert_eq!(config_source(None, Some(env.clone())), Some(env));
        assert_eq!(config_source(None, Some(PathBuf::new())), None);
        assert_eq!(config_source(None, None), None);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = EngineConfig::default();
        config.compression.mode = CompressionMode::Reference;
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
