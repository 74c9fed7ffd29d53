//! Database module
//!
//! This module provides all database functionality for dbpair, organized into:
//!
//! - **core**: client seam, PostgreSQL client and the open-and-verify helper
//! - **manager**: the `Database` manager holding the primary and secondary
//!   connections
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/             # Foundation
//! │   ├── client        # DatabaseClient / ClientConnection traits
//! │   ├── connection    # establish() and ConnectError
//! │   └── pg            # PostgreSQL implementation (postgres crate)
//! │
//! └── manager           # Database: primary + secondary slots
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use dbpair::database::Database;
//!
//! // Reads DB_PRIMARY_* and DB_SECONDARY_* (and .env, if present)
//! let mut db = Database::from_env()?;
//!
//! db.connect_primary()?;
//! db.connect_secondary()?;
//!
//! // ...
//!
//! db.close_all();
//! ```

pub mod core;
mod manager;

pub use core::{
    establish, ClientConnection, ClientError, ConnectError, ConnectErrorKind, DatabaseClient,
    PostgresClient, PostgresConnection, PROBE_QUERY,
};
pub use manager::{Database, Slot};
