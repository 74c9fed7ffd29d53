//! Core database infrastructure
//!
//! This module provides the foundational pieces the manager is built on:
//! - `DatabaseClient` / `ClientConnection`: the client seam
//! - `PostgresClient`: PostgreSQL implementation of the seam
//! - `establish`: open-and-verify helper with cleanup on failure

mod client;
mod connection;
mod pg;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientConnection, ClientError, DatabaseClient};
pub use connection::{establish, ConnectError, ConnectErrorKind};
pub use pg::{PostgresClient, PostgresConnection, PROBE_QUERY};
