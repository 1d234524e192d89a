//! Shortcut Ingest CLI - drives the ingestion pipeline from a terminal.
//!
//! `add` runs one automatic batch, `watch` treats stdin lines as drop
//! events, `queue` builds and runs a manual queue, `list` prints the store.

mod commands;
mod prompt;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shortcut_ingest::config::StoreConfig;
use shortcut_ingest::{IngestOptions, JsonShortcutStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "shortcut-ingest")]
#[command(about = "Turn files and folders into launcher shortcuts")]
struct Args {
    /// Shortcut store file (defaults to the user data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// JSON file with pipeline options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Category assigned to new shortcuts
    #[arg(long, global = true)]
    category: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add the given paths as one batch
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Read drop events from stdin, one per line, paths separated by tabs
    Watch,
    /// Queue paths and process them; Ctrl-C pauses after the current item
    Queue {
        paths: Vec<PathBuf>,

        /// Also prompt for a path on stdin
        #[arg(long)]
        pick: bool,
    },
    /// Print stored shortcuts
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut options = match &args.config {
        Some(path) => IngestOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => IngestOptions::default(),
    };
    if let Some(category) = args.category {
        options.category_id = Some(category);
    }
    debug!("Options: {:?}", options);

    let store_path = match args.store {
        Some(path) => path,
        None => default_store_path()?,
    };
    let store = Arc::new(JsonShortcutStore::open(&store_path)?);

    match args.command {
        Command::Add { paths } => commands::add(store, options, paths).await,
        Command::Watch => commands::watch(store, options).await,
        Command::Queue { paths, pick } => commands::queue(store, options, paths, pick).await,
        Command::List => commands::list(&store),
    }
}

fn default_store_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine the user data directory")?;
    Ok(data_dir
        .join(StoreConfig::APP_DIR_NAME)
        .join(StoreConfig::FILE_NAME))
}
