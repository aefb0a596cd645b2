//! Application configuration loaded from YAML.
//!
//! # Invariants
//! - Every field has a default, so an empty file is a valid configuration.
//! - `clients_path` defaults per backend when not set explicitly.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Storage used for the client book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Json,
    Yaml,
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Sqlite => "sqlite",
        }
    }

    pub fn default_clients_path(self) -> &'static str {
        match self {
            Self::Json => "clients.json",
            Self::Yaml => "clients.yaml",
            Self::Sqlite => "clients.sqlite3",
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_yaml::Error),
    UnknownBackend(String),
    EmptyPath(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::UnknownBackend(name) => {
                write!(f, "unknown backend `{name}`; expected json|yaml|sqlite")
            }
            Self::EmptyPath(field) => write!(f, "config field `{field}` cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::UnknownBackend(_) | Self::EmptyPath(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings shared by the CLI and embedding callers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub backend: StorageBackend,
    pub clients_path: Option<PathBuf>,
    pub items_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads and validates a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses and validates YAML text. Blank text yields defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(self.clients_path.as_deref()) {
            return Err(ConfigError::EmptyPath("clients_path"));
        }
        if is_blank(self.items_path.as_deref()) {
            return Err(ConfigError::EmptyPath("items_path"));
        }
        if is_blank(self.log_dir.as_deref()) {
            return Err(ConfigError::EmptyPath("log_dir"));
        }
        Ok(())
    }

    /// Client storage path, falling back to the backend default.
    pub fn resolved_clients_path(&self) -> PathBuf {
        self.clients_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.backend.default_clients_path()))
    }

    pub fn resolved_items_path(&self) -> PathBuf {
        self.items_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("items.json"))
    }
}

fn is_blank(path: Option<&Path>) -> bool {
    path.is_some_and(|path| path.as_os_str().to_string_lossy().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, StorageBackend};
    use std::path::PathBuf;

    #[test]
    fn empty_yaml_yields_json_defaults() {
        let config = AppConfig::from_yaml_str("").unwrap();
        assert_eq!(config.backend, StorageBackend::Json);
        assert_eq!(
            config.resolved_clients_path(),
            PathBuf::from("clients.json")
        );
        assert_eq!(config.resolved_items_path(), PathBuf::from("items.json"));
    }

    #[test]
    fn backend_default_path_follows_backend() {
        let config = AppConfig::from_yaml_str("backend: sqlite\n").unwrap();
        assert_eq!(
            config.resolved_clients_path(),
            PathBuf::from("clients.sqlite3")
        );
    }

    #[test]
    fn explicit_fields_are_kept() {
        let config = AppConfig::from_yaml_str(
            "backend: yaml\nclients_path: data/book.yaml\nlog_level: debug\n",
        )
        .unwrap();
        assert_eq!(config.backend, StorageBackend::Yaml);
        assert_eq!(
            config.resolved_clients_path(),
            PathBuf::from("data/book.yaml")
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_unknown_fields_and_blank_paths() {
        assert!(matches!(
            AppConfig::from_yaml_str("colour: blue\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AppConfig::from_yaml_str("items_path: ''\n"),
            Err(ConfigError::EmptyPath("items_path"))
        ));
    }

    #[test]
    fn backend_parses_aliases() {
        assert_eq!(
            "YML".parse::<StorageBackend>().unwrap(),
            StorageBackend::Yaml
        );
        assert_eq!(
            "db".parse::<StorageBackend>().unwrap(),
            StorageBackend::Sqlite
        );
        assert!("csv".parse::<StorageBackend>().is_err());
    }
}
