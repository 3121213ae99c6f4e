//! Configuration file and environment overrides
//!
//! ```toml
//! [logging]
//! level = "debug"
//! file = "devaarg.log"
//!
//! [library]
//! path = "libinnodb.so"
//! setter = "ib_cfg_set"
//! success_code = 10
//! ```

use core::ffi::c_int;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::logging::LogConfig;
use crate::setter::StatusCode;

/// File name looked up by [`Config::discover`]
pub const CONFIG_FILE: &str = "devaarg.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub library: Option<LibraryConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub spans: bool,
}

/// Shared library exposing a variadic option setter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub path: String,

    pub setter: String,

    #[serde(default = "default_success_code")]
    pub success_code: c_int,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            json: false,
            spans: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_success_code() -> c_int {
    StatusCode::DB_SUCCESS
}

impl LoggingConfig {
    /// Parsed level, `INFO` when unrecognised
    pub fn level(&self) -> Level {
        parse_level(&self.level).unwrap_or(Level::INFO)
    }

    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level(),
            log_path: self.file.clone(),
            json_format: self.json,
            show_spans: self.spans,
        }
    }
}

pub(crate) fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Find `devaarg.toml` in `start` or its parents
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load the nearest `devaarg.toml` above the working directory, or defaults
    pub fn discover() -> Result<Self, ConfigError> {
        let found = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::discover_from(&dir));

        match found {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Apply `DEVAARG_*` environment variables on top of this configuration
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup, keyed like the environment
    ///
    /// The result is validated again, so a bad `DEVAARG_LOG_LEVEL` is an
    /// error rather than a silent fallback.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("DEVAARG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = lookup("DEVAARG_LOG_FILE") {
            self.logging.file = Some(file);
        }
        if lookup("DEVAARG_LOG_JSON").is_some() {
            self.logging.json = true;
        }
        if lookup("DEVAARG_LOG_SPANS").is_some() {
            self.logging.spans = true;
        }

        let path = lookup("DEVAARG_LIBRARY");
        let setter = lookup("DEVAARG_SETTER");
        if let Some(lib) = self.library.as_mut() {
            if let Some(path) = path {
                lib.path = path;
            }
            if let Some(setter) = setter {
                lib.setter = setter;
            }
        } else if let (Some(path), Some(setter)) = (path, setter) {
            // A library section needs both keys to be meaningful
            self.library = Some(LibraryConfig {
                path,
                setter,
                success_code: default_success_code(),
            });
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if parse_level(&self.logging.level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        if let Some(lib) = &self.library {
            if lib.path.is_empty() {
                return Err(ConfigError::Invalid("library.path is empty".into()));
            }
            if lib.setter.is_empty() {
                return Err(ConfigError::Invalid("library.setter is empty".into()));
            }
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse(String),
    Invalid(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "Failed to read config {}: {}", path.display(), message)
            }
            Self::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
            Self::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.logging.level(), Level::INFO);
        assert!(config.library.is_none());
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            [logging]
            level = "debug"
            file = "devaarg.log"
            json = true

            [library]
            path = "libinnodb.so"
            setter = "ib_cfg_set"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level(), Level::DEBUG);
        assert_eq!(config.logging.file.as_deref(), Some("devaarg.log"));
        assert!(config.logging.json);
        assert!(!config.logging.spans);

        let lib = config.library.unwrap();
        assert_eq!(lib.path, "libinnodb.so");
        assert_eq!(lib.setter, "ib_cfg_set");
        assert_eq!(lib.success_code, StatusCode::DB_SUCCESS);
    }

    #[test]
    fn test_invalid_level() {
        let err = Config::parse("[logging]\nlevel = \"loud\"").unwrap_err();
        assert_eq!(err, ConfigError::Invalid("unknown log level 'loud'".into()));
    }

    #[test]
    fn test_missing_setter_is_parse_error() {
        let err = Config::parse("[library]\npath = \"libx.so\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("DEVAARG_LOG_LEVEL", "trace"),
            ("DEVAARG_LOG_SPANS", "1"),
            ("DEVAARG_LIBRARY", "libother.so"),
            ("DEVAARG_SETTER", "other_cfg_set"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.logging.level(), Level::TRACE);
        assert!(config.logging.spans);
        assert!(!config.logging.json);

        let lib = config.library.unwrap();
        assert_eq!(lib.path, "libother.so");
        assert_eq!(lib.setter, "other_cfg_set");
    }

    #[test]
    fn test_library_override_needs_both_keys() {
        let config = Config::default().with_overrides(|k| {
            (k == "DEVAARG_LIBRARY").then(|| "libother.so".to_string())
        })
        .unwrap();
        assert!(config.library.is_none());
    }

    #[test]
    fn test_bad_level_override_is_invalid() {
        let err = Config::default()
            .with_overrides(|k| (k == "DEVAARG_LOG_LEVEL").then(|| "chatty".to_string()))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("unknown log level 'chatty'".into()));
    }

    #[test]
    fn test_empty_library_override_is_invalid() {
        let config = Config::parse("[library]\npath = \"libx.so\"\nsetter = \"x_set\"").unwrap();
        let err = config
            .with_overrides(|k| (k == "DEVAARG_SETTER").then(String::new))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("library.setter is empty".into()));
    }

    #[test]
    fn test_to_log_config() {
        let logging = LoggingConfig {
            level: "warn".into(),
            file: Some("out.log".into()),
            json: true,
            spans: false,
        };
        let log = logging.to_log_config();
        assert_eq!(log.level, Level::WARN);
        assert_eq!(log.log_path.as_deref(), Some("out.log"));
        assert!(log.json_format);
    }
}
