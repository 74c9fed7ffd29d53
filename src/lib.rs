#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! dbpair - primary/secondary PostgreSQL connection manager
//!
//! dbpair opens two independent database connections, a *primary* and a
//! *secondary*, from credentials found in the environment. Every connection
//! is checked with a `SELECT 1` probe before it is handed out, and both can be
//! released with a single call. It can be used as both a command-line
//! application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none)  | Configuration loading and connection management | `postgres`, `config`, `dotenvy` |
//! | `cli`   | The `dbpair` binary | `clap`, `tracing-subscriber` |
//!
//! # Configuration
//!
//! Each connection reads five settings:
//!
//! ```text
//! DB_PRIMARY_HOST=localhost     DB_SECONDARY_HOST=localhost
//! DB_PRIMARY_PORT=5432          DB_SECONDARY_PORT=5433
//! DB_PRIMARY_NAME=app           DB_SECONDARY_NAME=app
//! DB_PRIMARY_USER=app           DB_SECONDARY_USER=app
//! DB_PRIMARY_PASS=secret        DB_SECONDARY_PASS=secret
//! ```
//!
//! All ten are required. They may live in a `.env` file or, through
//! [`config::load_settings`], in a TOML file with lowercase keys.
//!
//! # Architecture
//!
//! - **[`config`]**: configuration groups, sources and layered settings
//! - **[`database`]**: client seam, PostgreSQL client and the [`Database`] manager
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dbpair::Database;
//!
//! let mut db = Database::from_env()?;
//! db.connect_primary()?;
//! db.connect_secondary()?;
//! db.close_all();
//! ```
//!
//! ## Injecting configuration
//!
//! ```rust,ignore
//! use dbpair::{Database, PostgresClient};
//! use std::collections::HashMap;
//!
//! let mut settings = HashMap::new();
//! settings.insert("DB_PRIMARY_HOST".to_string(), "localhost".to_string());
//! // ...
//! let db = Database::new(PostgresClient::new(), &settings)?;
//! ```

pub mod config;
pub mod database;

// =============================================================================
// Configuration
// =============================================================================

pub use config::{
    load_settings, load_settings_with, ConfigError, ConfigSource, ConnectionConfig,
    DatabaseConfig, EnvSource, RedactedConfig, PRIMARY_PREFIX, SECONDARY_PREFIX,
};

// =============================================================================
// Database Module
// =============================================================================

pub use database::{
    establish, ClientConnection, ClientError, ConnectError, ConnectErrorKind, Database,
    DatabaseClient, PostgresClient, PostgresConnection, Slot,
};
