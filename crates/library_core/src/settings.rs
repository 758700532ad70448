//! Catalog store connection settings.
//!
//! # Responsibility
//! - Describe where and how the data-access context connects.
//! - Load settings from the environment or a `Key=Value;` connection string.
//!
//! # Invariants
//! - No store location is hard-coded; `data_source` must always be supplied.
//! - Validation happens before any connection is attempted.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// `data_source` value selecting a private in-memory catalog.
pub const MEMORY_DATA_SOURCE: &str = ":memory:";
/// Alias accepted in connection strings for the current directory.
const LOCAL_DATA_SOURCE: &str = "(local)";
const ENV_PREFIX: &str = "LIBRARY";
const CATALOG_FILE_EXTENSION: &str = "sqlite3";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("failed to read .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
    #[error("malformed connection string segment `{0}`; expected Key=Value")]
    MalformedPair(String),
    #[error("unknown connection string key `{0}`")]
    UnknownKey(String),
    #[error("connection string is missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("`{key}` expects a boolean, got `{value}`")]
    InvalidBool { key: String, value: String },
    #[error("`{key}` expects a non-negative integer, got `{value}`")]
    InvalidNumber { key: String, value: String },
    #[error("invalid `{key}` value `{value}`")]
    InvalidValue { key: &'static str, value: String },
    #[error("`{option}` is not supported: {reason}")]
    UnsupportedOption {
        option: &'static str,
        reason: &'static str,
    },
}

/// Connection settings for one catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding catalog files, or `:memory:`.
    pub data_source: String,
    #[serde(default = "LibraryConfig::default_initial_catalog")]
    pub initial_catalog: String,
    #[serde(default = "LibraryConfig::default_true")]
    pub integrated_security: bool,
    #[serde(default = "LibraryConfig::default_true")]
    pub multiple_active_result_sets: bool,
    #[serde(default)]
    pub trust_server_certificate: bool,
    #[serde(default)]
    pub encrypt: bool,
    #[serde(default = "LibraryConfig::default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Absolute directory for rolling log files. Not a connection option.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl LibraryConfig {
    fn default_initial_catalog() -> String {
        "library".to_string()
    }

    fn default_true() -> bool {
        true
    }

    fn default_busy_timeout_ms() -> u64 {
        5_000
    }

    /// Settings for a catalog stored under `data_source`, other options default.
    pub fn new(data_source: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            initial_catalog: Self::default_initial_catalog(),
            integrated_security: Self::default_true(),
            multiple_active_result_sets: Self::default_true(),
            trust_server_certificate: false,
            encrypt: false,
            busy_timeout_ms: Self::default_busy_timeout_ms(),
            log_dir: None,
        }
    }

    /// Settings for an isolated in-memory catalog.
    pub fn in_memory() -> Self {
        Self::new(MEMORY_DATA_SOURCE)
    }

    /// Replaces the catalog name.
    pub fn with_catalog(mut self, initial_catalog: impl Into<String>) -> Self {
        self.initial_catalog = initial_catalog.into();
        self
    }

    /// Loads settings from an optional `.env` file and `LIBRARY_*` variables.
    ///
    /// `LIBRARY_DATA_SOURCE` is required; every other key has a default.
    ///
    /// # Errors
    /// - `DotEnv` when a `.env` file exists but cannot be read or parsed.
    /// - `Load` when the variables do not deserialize into settings.
    pub fn from_env() -> ConfigResult<Self> {
        skip_missing_dotenv(dotenvy::dotenv())?;
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(source: config::Environment) -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(source.try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parses a `Key=Value;Key=Value` connection string.
    ///
    /// Keys are case-insensitive and ignore inner spaces. Recognized keys:
    /// `Data Source` (alias `Server`), `Initial Catalog` (alias `Database`),
    /// `Integrated Security`, `MultipleActiveResultSets`,
    /// `TrustServerCertificate`, `Encrypt`, `Busy Timeout`.
    pub fn from_connection_string(value: &str) -> ConfigResult<Self> {
        let mut data_source = None;
        let mut config = Self::new(String::new());

        for segment in value.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let (raw_key, raw_value) = segment
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedPair(segment.to_string()))?;
            let key = normalize_key(raw_key);
            let value = unquote(raw_value.trim());

            match key.as_str() {
                "datasource" | "server" => data_source = Some(resolve_data_source(value)),
                "initialcatalog" | "database" => config.initial_catalog = value.to_string(),
                "integratedsecurity" => {
                    config.integrated_security = value.eq_ignore_ascii_case("sspi")
                        || parse_bool(raw_key, value)?;
                }
                "multipleactiveresultsets" => {
                    config.multiple_active_result_sets = parse_bool(raw_key, value)?;
                }
                "trustservercertificate" => {
                    config.trust_server_certificate = parse_bool(raw_key, value)?;
                }
                "encrypt" => config.encrypt = parse_bool(raw_key, value)?,
                "busytimeout" => {
                    config.busy_timeout_ms =
                        value.parse().map_err(|_| ConfigError::InvalidNumber {
                            key: raw_key.trim().to_string(),
                            value: value.to_string(),
                        })?;
                }
                _ => return Err(ConfigError::UnknownKey(raw_key.trim().to_string())),
            }
        }

        config.data_source = data_source.ok_or(ConfigError::MissingKey("Data Source"))?;
        Ok(config)
    }

    /// Checks that the settings can be honored by the embedded store.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_source.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "data_source",
                value: self.data_source.clone(),
            });
        }

        let catalog = self.initial_catalog.trim();
        if catalog.is_empty() || catalog.contains(['/', '\\']) || catalog.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                key: "initial_catalog",
                value: self.initial_catalog.clone(),
            });
        }

        if self.encrypt {
            return Err(ConfigError::UnsupportedOption {
                option: "encrypt",
                reason: "the embedded catalog store cannot encrypt data at rest",
            });
        }

        Ok(())
    }

    /// Returns whether the catalog lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.data_source == MEMORY_DATA_SOURCE
    }

    /// Catalog database file, or `None` for in-memory settings.
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            return None;
        }
        Some(PathBuf::from(&self.data_source).join(format!(
            "{}.{CATALOG_FILE_EXTENSION}",
            self.initial_catalog.trim()
        )))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Only an absent `.env` file is tolerated.
fn skip_missing_dotenv(loaded: Result<PathBuf, dotenvy::Error>) -> ConfigResult<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn resolve_data_source(value: &str) -> String {
    if value.eq_ignore_ascii_case(LOCAL_DATA_SOURCE) {
        ".".to_string()
    } else {
        value.to_string()
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.trim().to_string(),
            value: value.to_string(),
        }),
    }
}
