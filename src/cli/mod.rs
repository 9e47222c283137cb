//! Command-line interface

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::HubConfig;
use crate::error::Result;

#[derive(Parser)]
#[command(
    name = "hub",
    version,
    about = "Faceted browse over an institutional sustainability resource hub"
)]
pub struct Cli {
    /// Path to a config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Database file, overriding config
    #[arg(long, global = true, value_name = "FILE", env = "HUB_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit machine-readable JSON instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database and bring the schema current
    Init(commands::init::InitArgs),
    /// Load the demo dataset
    Seed(commands::seed::SeedArgs),
    /// Run a faceted listing
    Browse(commands::browse::BrowseArgs),
    /// Show the facets of a listing and their choice values
    Choices(commands::choices::ChoicesArgs),
    /// Rebuild the full-text search index
    Reindex(commands::reindex::ReindexArgs),
}

impl Cli {
    fn config(&self) -> Result<HubConfig> {
        let mut config = HubConfig::load(self.config.as_deref())?;
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        Ok(config)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.config()?;
    match &cli.command {
        Command::Init(args) => commands::init::run(config, args, cli.json),
        Command::Seed(args) => commands::seed::run(config, args, cli.json),
        Command::Browse(args) => commands::browse::run(config, args, cli.json),
        Command::Choices(args) => commands::choices::run(config, args, cli.json),
        Command::Reindex(args) => commands::reindex::run(config, args, cli.json),
    }
}
