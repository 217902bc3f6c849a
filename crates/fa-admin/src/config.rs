//! fa-admin configuration
//!
//! Read from a TOML file (`fa-admin.toml` by default). Every section is
//! optional in the file; commands ask for the settings they need and get a
//! [`ConfigError::Missing`] naming the setting when it is blank.

use fa_pid::PidmanSettings;
use fa_prep::ArkSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const DEFAULT_CONFIG: &str = "fa-admin.toml";

/// Errors loading or reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`Config`]
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting a command needs is blank
    #[error("{0} setting is missing")]
    Missing(&'static str),

    /// Source directory could not be listed
    #[error("cannot list source directory {path}: {source}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for configuration lookups
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Document store settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per collection
    pub root: Option<PathBuf>,
    /// Published collection
    pub collection: String,
    /// Collection used for preview loads
    pub preview_collection: String,
}

/// Where archivists' EAD files live
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directories scanned for `*.xml` when no files are named
    pub dirs: Vec<PathBuf>,
}

/// Public site settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL ARKs resolve to, e.g. `https://findingaids.example.edu/`
    pub base_url: String,
}

/// PID manager settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidmanConfig {
    /// Service base URL
    pub host: String,
    /// Account name
    pub user: String,
    /// Account password
    pub password: String,
    /// Domain new ARKs are created in
    pub domain: String,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `LEVEL: message` lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `fa_prep=debug`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Complete fa-admin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[store]`
    pub store: StoreConfig,
    /// `[source]`
    pub source: SourceConfig,
    /// `[site]`
    pub site: SiteConfig,
    /// `[pidman]`
    pub pidman: PidmanConfig,
    /// `[logging]`
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML.
    pub fn from_toml(text: &str, origin: impl Into<PathBuf>) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.into(),
            source,
        })
    }

    /// Read a config file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Read `path` when given, else the default file if it exists, else defaults
    ///
    /// # Errors
    ///
    /// Errors of [`Config::load`]; an explicitly named file must exist.
    pub fn discover(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG).exists() => Self::load(DEFAULT_CONFIG),
            None => Ok(Self::default()),
        }
    }

    /// Store root directory
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when unset.
    pub fn store_root(&self) -> ConfigResult<&Path> {
        self.store
            .root
            .as_deref()
            .filter(|root| !root.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("store.root"))
    }

    /// Published collection, or the preview collection when `preview`
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when the chosen collection is blank.
    pub fn collection(&self, preview: bool) -> ConfigResult<&str> {
        let (value, name) = if preview {
            (&self.store.preview_collection, "store.preview_collection")
        } else {
            (&self.store.collection, "store.collection")
        };
        required(value, name)
    }

    /// ARK settings for prep
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] for a blank site URL or PID domain.
    pub fn ark_settings(&self) -> ConfigResult<ArkSettings> {
        Ok(ArkSettings {
            site_base_url: required(&self.site.base_url, "site.base_url")?.to_string(),
            domain: required(&self.pidman.domain, "pidman.domain")?.to_string(),
        })
    }

    /// Connection settings for the PID manager client
    #[must_use]
    pub fn pidman_settings(&self) -> PidmanSettings {
        PidmanSettings {
            host: self.pidman.host.clone(),
            user: self.pidman.user.clone(),
            password: self.pidman.password.clone(),
            timeout: self.pidman.timeout_secs.map(Duration::from_secs),
        }
    }

    /// EAD files to process: `named` when given, else every `*.xml` in the
    /// source directories, sorted
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when no files are named and no source
    /// directories are configured, [`ConfigError::SourceDir`] when one
    /// cannot be listed.
    pub fn source_files(&self, named: &[PathBuf]) -> ConfigResult<Vec<PathBuf>> {
        if !named.is_empty() {
            return Ok(named.to_vec());
        }
        if self.source.dirs.is_empty() {
            return Err(ConfigError::Missing("source.dirs"));
        }
        let mut files = Vec::new();
        for dir in &self.source.dirs {
            let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::SourceDir {
                path: dir.clone(),
                source,
            })?;
            files.extend(
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "xml")),
            );
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn required<'a>(value: &'a str, name: &'static str) -> ConfigResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::Missing(name))
    } else {
        Ok(value)
    }
}
