use anyhow::Result;
use clap::Args;
use dbpair::{DatabaseConfig, RedactedConfig};
use serde::Serialize;

use super::print_json;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[clap(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    primary: RedactedConfig,
    secondary: RedactedConfig,
}

pub fn run(settings: &::config::Config, args: ConfigArgs) -> Result<()> {
    let ConfigArgs { json, pretty } = args;

    let config = DatabaseConfig::load(settings)?;

    if json || pretty {
        let info = ConfigInfo {
            primary: config.primary.redacted(),
            secondary: config.secondary.redacted(),
        };
        return print_json(&info, pretty);
    }

    println!("{}", config.summary());
    Ok(())
}
