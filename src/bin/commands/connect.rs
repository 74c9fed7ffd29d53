use anyhow::Result;
use clap::Args;
use dbpair::{Database, PostgresClient, Slot};
use serde::Serialize;
use tracing::info;

use super::print_json;

/// Arguments for the Connect command
#[derive(Args)]
pub struct ConnectArgs {
    /// Close both connections before exiting
    #[clap(long)]
    pub close: bool,

    /// Output as JSON
    #[clap(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct ConnectionSummary {
    slot: String,
    target: String,
    user: String,
    connected: bool,
}

pub fn run(settings: &::config::Config, args: ConnectArgs) -> Result<()> {
    let ConnectArgs {
        close,
        json,
        pretty,
    } = args;

    let mut db = Database::new(PostgresClient::new(), settings)?;

    db.connect_primary()?;
    db.connect_secondary()?;

    let summaries: Vec<ConnectionSummary> = Slot::all()
        .into_iter()
        .map(|slot| {
            let config = db.slot_config(slot);
            ConnectionSummary {
                slot: slot.to_string(),
                target: config.target(),
                user: config.user.clone(),
                connected: db.is_connected(slot),
            }
        })
        .collect();

    if json || pretty {
        print_json(&summaries, pretty)?;
    } else {
        for s in &summaries {
            println!("{:<10} {} (user {})", s.slot, s.target, s.user);
        }
    }

    if close {
        info!("Closing all connections");
        db.close_all();
    }

    Ok(())
}
