//! Compiles shift scheduling rules into constraint models, and solves them.

use anyhow::Result;
use app::{ExportCommand, SolveCommand};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Export(ExportCommand),
    Solve(SolveCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    match cli.command {
        Command::Export(c) => c.execute(),
        Command::Solve(c) => c.execute(),
    }
}
