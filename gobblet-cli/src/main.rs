//! Play Gobblet Jr. in the terminal.
//!
//! Usage:
//!   gobblet [--config Gobblet.toml] [--first A|B]
//!
//! Commands are read from stdin one per line; type `help` for the list.
//! Logs go to stderr, filtered by `[log] filter` or `GOBBLET_LOG`.

mod command;
mod config;
mod session;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gobblet_engine::{Color, GameEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "gobblet")]
#[command(about = "Gobblet Jr. on a 3x3 board, two players at one terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "Gobblet.toml")]
    config: PathBuf,

    /// Color that moves first, overriding the configuration
    #[arg(long)]
    first: Option<Color>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(first) = args.first {
        config.engine.starting_color = first;
    }

    // stdout is the game
    let filter = EnvFilter::try_new(&config.log.filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(first = %config.engine.starting_color, "starting game");

    let engine = GameEngine::new(config.engine);
    session::run(engine, io::stdin().lock(), io::stdout().lock())
}
