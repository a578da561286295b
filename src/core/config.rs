//! Deploy-time configuration.
//!
//! The only tunable is the backend base URL. Resolution order: command-line
//! flag, then the `SAHAYAK_BACKEND_URL` environment variable, then the
//! config file, then the built-in default.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const BACKEND_URL_ENV: &str = "SAHAYAK_BACKEND_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    pub backend_url: Option<String>,
}

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "sahayak", "sahayak")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolve the backend base URL from the CLI flag, the environment, the
    /// config file, and the default, in that order.
    pub fn resolve_backend_url(&self, cli_flag: Option<&str>) -> String {
        if let Some(url) = non_empty(cli_flag) {
            return url;
        }
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if let Some(url) = non_empty(Some(&url)) {
                return url;
            }
        }
        if let Some(url) = non_empty(self.backend_url.as_deref()) {
            return url;
        }
        DEFAULT_BACKEND_URL.to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config::load_from_path(&dir.path().join("absent.toml")).expect("defaults");
        assert!(config.backend_url.is_none());
    }

    #[test]
    fn file_contents_are_parsed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).expect("config file");
        writeln!(file, "backend_url = \"https://assist.example.org\"").expect("written");

        let config = Config::load_from_path(&path).expect("parsed");
        assert_eq!(
            config.backend_url.as_deref(),
            Some("https://assist.example.org")
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = [not toml").expect("written");

        let err = Config::load_from_path(&path).expect_err("parse failure");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn cli_flag_wins_over_file_and_default() {
        let config = Config {
            backend_url: Some("http://from-file:5000".to_string()),
        };
        assert_eq!(
            config.resolve_backend_url(Some("http://from-flag:5000")),
            "http://from-flag:5000"
        );
        assert_eq!(config.resolve_backend_url(None), "http://from-file:5000");
        assert_eq!(config.resolve_backend_url(Some("   ")), "http://from-file:5000");

        let empty = Config::default();
        assert_eq!(empty.resolve_backend_url(None), DEFAULT_BACKEND_URL);
    }
}
