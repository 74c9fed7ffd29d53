//! Connection configuration
//!
//! Each logical connection is described by a *configuration group*: five
//! settings read under a common prefix.
//!
//! | Key              | Meaning       |
//! |------------------|---------------|
//! | `{prefix}_HOST`  | server host   |
//! | `{prefix}_PORT`  | server port   |
//! | `{prefix}_NAME`  | database name |
//! | `{prefix}_USER`  | login role    |
//! | `{prefix}_PASS`  | password      |
//!
//! Values are looked up through a [`ConfigSource`], so the loader never has to
//! touch the process environment directly. [`EnvSource`] is the production
//! source; tests hand in a `HashMap` instead.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Environment prefix of the primary configuration group
pub const PRIMARY_PREFIX: &str = "DB_PRIMARY";

/// Environment prefix of the secondary configuration group
pub const SECONDARY_PREFIX: &str = "DB_SECONDARY";

const HOST_SUFFIX: &str = "HOST";
const PORT_SUFFIX: &str = "PORT";
const NAME_SUFFIX: &str = "NAME";
const USER_SUFFIX: &str = "USER";
const PASS_SUFFIX: &str = "PASS";

/// Errors raised while loading configuration groups
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more of the five keys is unset or empty
    #[error("Missing required environment variables: {prefix} ({})", .keys.join(", "))]
    Missing { prefix: String, keys: Vec<String> },

    /// The port value is not a valid TCP port number
    #[error("Invalid port for {prefix}: '{value}'")]
    InvalidPort { prefix: String, value: String },
}

impl ConfigError {
    /// Prefix of the configuration group that failed to load
    pub fn prefix(&self) -> &str {
        match self {
            ConfigError::Missing { prefix, .. } => prefix,
            ConfigError::InvalidPort { prefix, .. } => prefix,
        }
    }
}

/// A key-value lookup that configuration groups are read from
pub trait ConfigSource {
    /// Return the raw value stored under `key`, if any
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads values from the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl EnvSource {
    pub fn new() -> Self {
        EnvSource
    }

    /// Load a `.env` file from the current directory (or its parents) into the
    /// process environment, then return the source.
    ///
    /// A missing `.env` file is not an error; variables already present in
    /// the environment take precedence over the file.
    pub fn load_dotenv() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => debug!("Ignoring unreadable .env file: {}", e),
        }
        EnvSource
    }
}

impl ConfigSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<F> ConfigSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Layered settings built by [`load_settings`]. Keys are matched lowercase.
impl ConfigSource for config::Config {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get_string(&key.to_ascii_lowercase()).ok()
    }
}

/// Build layered settings from an optional TOML file and the environment
///
/// Environment variables override file values. File keys are written in
/// lowercase, e.g. `db_primary_host = "localhost"`.
pub fn load_settings(path: Option<&str>) -> Result<config::Config> {
    load_settings_with(path, config::Environment::default())
}

/// Same as [`load_settings`], layering the given environment source instead
/// of the process environment
pub fn load_settings_with(
    path: Option<&str>,
    environment: config::Environment,
) -> Result<config::Config> {
    let mut builder = config::Config::builder();

    if let Some(p) = path {
        if !Path::new(p).exists() {
            return Err(anyhow!("Configuration file '{}' does not exist", p));
        }
        builder = builder.add_source(config::File::new(p, config::FileFormat::Toml));
    }

    builder = builder.add_source(environment);

    builder
        .build()
        .map_err(|e| anyhow!("Failed to build configuration: {}", e))
}

/// Credentials and address of one database
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionConfig {
    /// Read the configuration group stored under `prefix`
    ///
    /// All five keys must be present and non-empty; every absent key is
    /// reported in the returned error.
    pub fn load<S: ConfigSource + ?Sized>(source: &S, prefix: &str) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut read = |suffix: &str| -> String {
            let key = format!("{}_{}", prefix, suffix);
            match source.lookup(&key) {
                Some(v) if !v.trim().is_empty() => v,
                _ => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let host = read(HOST_SUFFIX);
        let port = read(PORT_SUFFIX);
        let database = read(NAME_SUFFIX);
        let user = read(USER_SUFFIX);
        let password = read(PASS_SUFFIX);

        if !missing.is_empty() {
            return Err(ConfigError::Missing {
                prefix: prefix.to_string(),
                keys: missing,
            });
        }

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort {
                prefix: prefix.to_string(),
                value: port.clone(),
            })?;

        debug!("Loaded configuration group {}", prefix);

        Ok(ConnectionConfig {
            host,
            port,
            database,
            user,
            password,
        })
    }

    /// `database@host:port`
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.database, self.host, self.port)
    }

    /// A copy safe to print or serialize
    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            password: "********".to_string(),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (user {})", self.target(), self.user)
    }
}

/// Printable view of a [`ConnectionConfig`] with the password masked
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RedactedConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

/// Both configuration groups used by the database manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub primary: ConnectionConfig,
    pub secondary: ConnectionConfig,
}

impl DatabaseConfig {
    /// Load the primary group, then the secondary group
    pub fn load<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, ConfigError> {
        let primary = ConnectionConfig::load(source, PRIMARY_PREFIX)?;
        let secondary = ConnectionConfig::load(source, SECONDARY_PREFIX)?;
        Ok(DatabaseConfig { primary, secondary })
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Primary:    {}", self.primary),
            format!("Secondary:  {}", self.secondary),
        ]
        .join("\n")
    }
}
