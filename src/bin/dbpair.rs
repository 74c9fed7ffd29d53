use anyhow::Result;
use clap::{Parser, Subcommand};
use dbpair::EnvSource;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// TOML settings file; environment variables and .env take precedence
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the primary and then the secondary database
    Connect(commands::connect::ConnectArgs),

    /// Show the resolved configuration of both databases
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level DEBUG or higher.
            .with_max_level(Level::DEBUG)
            .init();
    }

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // populate the environment from .env before layering settings on top
    EnvSource::load_dotenv();
    let settings = dbpair::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Connect(args) => commands::connect::run(&settings, args),
        Commands::Config(args) => commands::config::run(&settings, args),
    }
}
