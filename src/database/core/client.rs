//! Database client seam
//!
//! The manager and the establisher only talk to a database through these two
//! traits. [`PostgresClient`](super::PostgresClient) is the production
//! implementation; tests plug in scripted fakes.

use crate::config::ConnectionConfig;
use thiserror::Error;

/// Failure reported by a database client
///
/// The variants follow the client's own view of what went wrong; the
/// establisher turns them into a [`ConnectError`](super::ConnectError) with
/// target context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Network, authentication or session-level failure
    #[error("{0}")]
    Connection(String),

    /// The server rejected a statement
    #[error("{0}")]
    Query(String),

    /// Anything the client could not classify
    #[error("{0}")]
    Unexpected(String),
}

/// Opens connections to a database server
pub trait DatabaseClient {
    type Connection: ClientConnection;

    /// Open a new session using the given credentials
    fn open(&self, config: &ConnectionConfig) -> Result<Self::Connection, ClientError>;
}

/// A live session returned by [`DatabaseClient::open`]
pub trait ClientConnection {
    /// Minimal round trip confirming the session is usable
    fn probe(&mut self) -> Result<(), ClientError>;

    /// Close the session, releasing its socket
    fn close(self) -> Result<(), ClientError>;
}
