use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use quill_config::QuillConfig;
use quill_store::TrailStore;

mod cli;
mod commands;
mod output;
mod views;

fn main() {
    if let Err(error) = run() {
        eprintln!("quill error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = QuillConfig::load_with_dotenv().context("failed to load quill configuration")?;
    init_tracing(cli.quiet, cli.verbose, &config.general.log_level)?;

    let flags = cli.global_flags();
    let store_dir = flags
        .store
        .as_deref()
        .map_or_else(|| config.store.dir(), PathBuf::from);
    let store = TrailStore::open(&store_dir)
        .with_context(|| format!("failed to open trail store at {}", store_dir.display()))?;
    tracing::debug!("Using trail store at {}", store.dir().display());

    commands::dispatch(&cli.command, &store, &config, &flags)
}

fn init_tracing(quiet: bool, verbose: bool, configured: &str) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("QUILL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
