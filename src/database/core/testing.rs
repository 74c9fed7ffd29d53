//! Scripted in-process stand-in for a database client
//!
//! Each fake connection records open, probe and close calls in shared
//! counters so tests can assert that no session outlives a failure path.

use super::client::{ClientConnection, ClientError, DatabaseClient};
use crate::config::ConnectionConfig;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// How a fake target behaves
#[derive(Debug, Clone)]
pub enum Script {
    Healthy,
    /// The first open succeeds, later ones are refused
    HealthyOnce(String),
    RefuseOpen(String),
    BreakOpen(String),
    RejectProbe(String),
    DropDuringProbe(String),
    GarbleProbe(String),
}

#[derive(Debug, Default)]
pub struct Stats {
    opened: Cell<usize>,
    probed: Cell<usize>,
    closed: Cell<usize>,
    live: Cell<usize>,
    closed_ids: RefCell<Vec<usize>>,
}

impl Stats {
    pub fn opened(&self) -> usize {
        self.opened.get()
    }
}

fn bump(cell: &Cell<usize>) {
    cell.set(cell.get() + 1);
}

pub struct FakeClient {
    default: Script,
    by_host: HashMap<String, Script>,
    fail_close: bool,
    stats: Rc<Stats>,
}

impl FakeClient {
    pub fn new(default: Script) -> Self {
        FakeClient {
            default,
            by_host: HashMap::new(),
            fail_close: false,
            stats: Rc::new(Stats::default()),
        }
    }

    /// Override the script for one host
    pub fn with_host(mut self, host: &str, script: Script) -> Self {
        self.by_host.insert(host.to_string(), script);
        self
    }

    /// Counters shared with every connection this client opens
    pub fn stats(&self) -> Rc<Stats> {
        Rc::clone(&self.stats)
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.stats.opened.get()
    }

    pub fn probed(&self) -> usize {
        self.stats.probed.get()
    }

    pub fn closed(&self) -> usize {
        self.stats.closed.get()
    }

    /// Sessions opened and not yet closed
    pub fn live(&self) -> usize {
        self.stats.live.get()
    }

    /// Ids of closed sessions, in closing order
    pub fn closed_ids(&self) -> Vec<usize> {
        self.stats.closed_ids.borrow().clone()
    }
}

impl DatabaseClient for FakeClient {
    type Connection = FakeConnection;

    fn open(&self, config: &ConnectionConfig) -> Result<FakeConnection, ClientError> {
        let script = self
            .by_host
            .get(&config.host)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        match &script {
            Script::RefuseOpen(cause) => return Err(ClientError::Connection(cause.clone())),
            Script::BreakOpen(cause) => return Err(ClientError::Unexpected(cause.clone())),
            Script::HealthyOnce(cause) if self.opened() > 0 => {
                return Err(ClientError::Connection(cause.clone()))
            }
            _ => {}
        }

        bump(&self.stats.opened);
        bump(&self.stats.live);

        Ok(FakeConnection {
            id: self.stats.opened.get(),
            target: config.target(),
            script,
            fail_close: self.fail_close,
            stats: Rc::clone(&self.stats),
        })
    }
}

#[derive(Debug)]
pub struct FakeConnection {
    /// 1-based order in which the session was opened
    pub id: usize,
    pub target: String,
    script: Script,
    fail_close: bool,
    stats: Rc<Stats>,
}

impl ClientConnection for FakeConnection {
    fn probe(&mut self) -> Result<(), ClientError> {
        bump(&self.stats.probed);
        match &self.script {
            Script::RejectProbe(cause) => Err(ClientError::Query(cause.clone())),
            Script::DropDuringProbe(cause) => Err(ClientError::Connection(cause.clone())),
            Script::GarbleProbe(cause) => Err(ClientError::Unexpected(cause.clone())),
            _ => Ok(()),
        }
    }

    fn close(self) -> Result<(), ClientError> {
        bump(&self.stats.closed);
        self.stats.live.set(self.stats.live.get() - 1);
        self.stats.closed_ids.borrow_mut().push(self.id);
        if self.fail_close {
            Err(ClientError::Connection("close failed".to_string()))
        } else {
            Ok(())
        }
    }
}
