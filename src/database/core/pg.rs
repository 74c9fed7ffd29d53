//! PostgreSQL client backed by the synchronous `postgres` crate

use super::client::{ClientConnection, ClientError, DatabaseClient};
use crate::config::ConnectionConfig;
use postgres::{Client, NoTls};
use std::error::Error as _;
use tracing::debug;

/// Statement used as the liveness probe
pub const PROBE_QUERY: &str = "SELECT 1";

/// Opens plain-TCP PostgreSQL sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresClient;

impl PostgresClient {
    pub fn new() -> Self {
        PostgresClient
    }
}

impl DatabaseClient for PostgresClient {
    type Connection = PostgresConnection;

    fn open(&self, config: &ConnectionConfig) -> Result<PostgresConnection, ClientError> {
        let client = postgres::Config::new()
            .host(&config.host)
            .port(config.port)
            .dbname(&config.database)
            .user(&config.user)
            .password(&config.password)
            .connect(NoTls)
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(PostgresConnection { client })
    }
}

/// An open PostgreSQL session
pub struct PostgresConnection {
    client: Client,
}

impl PostgresConnection {
    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }
}

impl ClientConnection for PostgresConnection {
    fn probe(&mut self) -> Result<(), ClientError> {
        let row = self
            .client
            .query_one(PROBE_QUERY, &[])
            .map_err(classify_query_error)?;

        let value: i32 = row
            .try_get(0)
            .map_err(|e| ClientError::Unexpected(format!("Unreadable probe result: {}", e)))?;
        if value != 1 {
            return Err(ClientError::Unexpected(format!(
                "Probe returned {} instead of 1",
                value
            )));
        }

        debug!("Probe succeeded");
        Ok(())
    }

    fn close(self) -> Result<(), ClientError> {
        self.client
            .close()
            .map_err(|e| ClientError::Connection(e.to_string()))
    }
}

fn classify_query_error(e: postgres::Error) -> ClientError {
    let io_failure = e
        .source()
        .is_some_and(|s| s.downcast_ref::<std::io::Error>().is_some());

    if e.is_closed() || io_failure {
        ClientError::Connection(e.to_string())
    } else if let Some(db) = e.as_db_error() {
        ClientError::Query(db.to_string())
    } else {
        ClientError::Unexpected(e.to_string())
    }
}
