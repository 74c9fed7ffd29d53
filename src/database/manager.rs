//! Primary/secondary connection manager

use crate::config::{ConfigError, ConfigSource, ConnectionConfig, DatabaseConfig, EnvSource};
use crate::config::{PRIMARY_PREFIX, SECONDARY_PREFIX};
use crate::database::core::{
    establish, ClientConnection, ConnectError, DatabaseClient, PostgresClient,
};
use std::fmt;
use tracing::{info, warn};

/// One of the two connection slots held by [`Database`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Primary,
    Secondary,
}

impl Slot {
    pub fn all() -> [Slot; 2] {
        [Slot::Primary, Slot::Secondary]
    }

    /// Environment prefix of the slot's configuration group
    pub fn prefix(&self) -> &'static str {
        match self {
            Slot::Primary => PRIMARY_PREFIX,
            Slot::Secondary => SECONDARY_PREFIX,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Primary => "primary",
            Slot::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Owns the primary and secondary configurations and their live connections
///
/// Connections are opened only by explicit [`connect_primary`](Self::connect_primary)
/// and [`connect_secondary`](Self::connect_secondary) calls and released by
/// [`close_all`](Self::close_all). Connecting a slot that already holds a
/// connection closes the old one first.
pub struct Database<C: DatabaseClient = PostgresClient> {
    client: C,
    config: DatabaseConfig,
    primary_conn: Option<C::Connection>,
    secondary_conn: Option<C::Connection>,
}

impl Database<PostgresClient> {
    /// Load `.env`, read both configuration groups from the environment and
    /// build a manager using the PostgreSQL client
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(PostgresClient::new(), &EnvSource::load_dotenv())
    }
}

impl<C: DatabaseClient> Database<C> {
    /// Read both configuration groups from `source`
    ///
    /// No connection is attempted; a missing setting fails here.
    pub fn new<S: ConfigSource + ?Sized>(client: C, source: &S) -> Result<Self, ConfigError> {
        let config = DatabaseConfig::load(source)?;
        Ok(Self::with_config(client, config))
    }

    pub fn with_config(client: C, config: DatabaseConfig) -> Self {
        Database {
            client,
            config,
            primary_conn: None,
            secondary_conn: None,
        }
    }

    /// Connect to the primary database and keep the connection
    pub fn connect_primary(&mut self) -> Result<&mut C::Connection, ConnectError> {
        self.connect(Slot::Primary)
    }

    /// Connect to the secondary database and keep the connection
    pub fn connect_secondary(&mut self) -> Result<&mut C::Connection, ConnectError> {
        self.connect(Slot::Secondary)
    }

    /// Connect the given slot
    ///
    /// A connection already held by the slot is closed before the new attempt.
    /// On failure the slot is left empty.
    pub fn connect(&mut self, slot: Slot) -> Result<&mut C::Connection, ConnectError> {
        if self.is_connected(slot) {
            warn!("Replacing open {} connection", slot);
            self.close(slot);
        }

        let config = self.slot_config(slot);
        let conn = establish(&self.client, config)?;
        info!("Connected {} database {}", slot, config.target());

        Ok(self.slot_mut(slot).insert(conn))
    }

    /// Close the connection held by `slot`, if any
    pub fn close(&mut self, slot: Slot) {
        let Some(conn) = self.slot_mut(slot).take() else {
            return;
        };

        match conn.close() {
            Ok(()) => info!("Closed {} connection", slot),
            Err(e) => warn!("Error while closing {} connection: {}", slot, e),
        }
    }

    /// Close both connections; a no-op for slots that are already empty
    pub fn close_all(&mut self) {
        for slot in Slot::all() {
            self.close(slot);
        }
    }

    pub fn is_connected(&self, slot: Slot) -> bool {
        self.conn(slot).is_some()
    }

    pub fn conn(&self, slot: Slot) -> Option<&C::Connection> {
        match slot {
            Slot::Primary => self.primary_conn.as_ref(),
            Slot::Secondary => self.secondary_conn.as_ref(),
        }
    }

    pub fn primary_conn(&self) -> Option<&C::Connection> {
        self.conn(Slot::Primary)
    }

    pub fn secondary_conn(&self) -> Option<&C::Connection> {
        self.conn(Slot::Secondary)
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Configuration group used by `slot`
    pub fn slot_config(&self, slot: Slot) -> &ConnectionConfig {
        match slot {
            Slot::Primary => &self.config.primary,
            Slot::Secondary => &self.config.secondary,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<C::Connection> {
        match slot {
            Slot::Primary => &mut self.primary_conn,
            Slot::Secondary => &mut self.secondary_conn,
        }
    }
}
