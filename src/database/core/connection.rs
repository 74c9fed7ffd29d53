//! Connection establishment
//!
//! [`establish`] opens a session, proves it usable with the client's probe and
//! only then hands it out. Any session opened along a failing path is closed
//! before the error is returned.

use super::client::{ClientConnection, ClientError, DatabaseClient};
use crate::config::ConnectionConfig;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a connection attempt failed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Network or credential failure
    #[error("Operational Error connecting to {database}@{host}:{port}. Please check credentials/network. Error: {cause}")]
    Connectivity {
        host: String,
        port: u16,
        database: String,
        cause: String,
    },

    /// The session opened but the probe was rejected
    #[error("Database Error during verification: {cause}")]
    Verification {
        host: String,
        port: u16,
        database: String,
        cause: String,
    },

    /// Any failure the client could not classify
    #[error("An unexpected error occurred while connect to database: {cause}")]
    Unknown {
        host: String,
        port: u16,
        database: String,
        cause: String,
    },
}

/// Discriminant of [`ConnectError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectErrorKind {
    Connectivity,
    Verification,
    Unknown,
}

impl ConnectError {
    fn new(kind: ConnectErrorKind, config: &ConnectionConfig, cause: String) -> Self {
        let host = config.host.clone();
        let port = config.port;
        let database = config.database.clone();
        match kind {
            ConnectErrorKind::Connectivity => ConnectError::Connectivity {
                host,
                port,
                database,
                cause,
            },
            ConnectErrorKind::Verification => ConnectError::Verification {
                host,
                port,
                database,
                cause,
            },
            ConnectErrorKind::Unknown => ConnectError::Unknown {
                host,
                port,
                database,
                cause,
            },
        }
    }

    pub fn kind(&self) -> ConnectErrorKind {
        match self {
            ConnectError::Connectivity { .. } => ConnectErrorKind::Connectivity,
            ConnectError::Verification { .. } => ConnectErrorKind::Verification,
            ConnectError::Unknown { .. } => ConnectErrorKind::Unknown,
        }
    }

    /// `database@host:port` of the failed attempt
    pub fn target(&self) -> String {
        match self {
            ConnectError::Connectivity {
                host,
                port,
                database,
                ..
            }
            | ConnectError::Verification {
                host,
                port,
                database,
                ..
            }
            | ConnectError::Unknown {
                host,
                port,
                database,
                ..
            } => format!("{}@{}:{}", database, host, port),
        }
    }

    /// Underlying cause text reported by the client
    pub fn cause(&self) -> &str {
        match self {
            ConnectError::Connectivity { cause, .. }
            | ConnectError::Verification { cause, .. }
            | ConnectError::Unknown { cause, .. } => cause,
        }
    }
}

/// Open a verified connection to the database described by `config`
pub fn establish<C: DatabaseClient>(
    client: &C,
    config: &ConnectionConfig,
) -> Result<C::Connection, ConnectError> {
    debug!("Opening connection to {}", config.target());

    let mut conn = client.open(config).map_err(|e| match e {
        ClientError::Unexpected(cause) => {
            ConnectError::new(ConnectErrorKind::Unknown, config, cause)
        }
        ClientError::Connection(cause) | ClientError::Query(cause) => {
            ConnectError::new(ConnectErrorKind::Connectivity, config, cause)
        }
    })?;

    if let Err(e) = conn.probe() {
        let (kind, cause) = match e {
            ClientError::Connection(cause) => (ConnectErrorKind::Connectivity, cause),
            ClientError::Query(cause) => (ConnectErrorKind::Verification, cause),
            ClientError::Unexpected(cause) => (ConnectErrorKind::Unknown, cause),
        };
        if let Err(close_err) = conn.close() {
            warn!(
                "Failed to close unverified connection to {}: {}",
                config.target(),
                close_err
            );
        }
        return Err(ConnectError::new(kind, config, cause));
    }

    Ok(conn)
}
