mod cli;
mod config;
mod directive;
mod evaluate;
mod irr;
mod model;
mod report;
mod sync;
mod tracker;

use std::process;

use clap::Parser;
use tracing::Level;

fn main() {
    let cli = cli::Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
