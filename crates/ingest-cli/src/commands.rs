//! Subcommand implementations.

use crate::prompt::PromptDialog;
use anyhow::Result;
use shortcut_ingest::{
    BatchSession, ChannelDragSource, DragEvent, IngestOptions, ItemStatus, JsonShortcutStore,
    ShortcutIngest, StartOutcome, TracingObserver,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

fn pipeline(store: Arc<JsonShortcutStore>, options: IngestOptions) -> ShortcutIngest {
    ShortcutIngest::local(store, Arc::new(TracingObserver), options)
}

pub async fn add(
    store: Arc<JsonShortcutStore>,
    options: IngestOptions,
    paths: Vec<PathBuf>,
) -> Result<()> {
    let ingest = pipeline(store, options);

    match ingest.run_batch(paths).await {
        Some(summary) => println!("{}", summary.notice().message),
        None => warn!("Another batch is running"),
    }
    print_session(&ingest.orchestrator().last_session());
    Ok(())
}

pub async fn watch(store: Arc<JsonShortcutStore>, options: IngestOptions) -> Result<()> {
    let ingest = pipeline(store, options);
    let source = ChannelDragSource::new();
    let handle = ingest.watch(&source)?;

    info!("Reading drop events from stdin (tab-separated paths, EOF to stop)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let paths = parse_drop(&line);
        if paths.is_empty() {
            continue;
        }
        source.emit(DragEvent::enter(paths.clone()));
        source.emit(DragEvent::drop(paths));
    }

    drop(source);
    let stats = handle.finish().await;
    info!(
        "Watch finished: {} batch(es) dispatched, {} discarded, {} superseded",
        stats.dispatched, stats.discarded, stats.superseded
    );
    Ok(())
}

pub async fn queue(
    store: Arc<JsonShortcutStore>,
    options: IngestOptions,
    paths: Vec<PathBuf>,
    pick: bool,
) -> Result<()> {
    let ingest = pipeline(store, options).with_dialog(Arc::new(PromptDialog::new()));
    let queue = ingest.queue().clone();

    for path in paths {
        if let Err(e) = queue.add_path(&path).await {
            warn!("Skipping {}: {}", path.display(), e);
        }
    }
    if pick {
        match queue.add_from_dialog().await? {
            Some(item) => info!("Queued {}", item.display_name),
            None => info!("Nothing picked"),
        }
    }

    let runner = queue.clone();
    let mut run = tokio::spawn(async move { runner.start().await });
    let outcome = tokio::select! {
        outcome = &mut run => outcome?,
        _ = tokio::signal::ctrl_c() => {
            info!("Pausing after the current item");
            queue.pause();
            run.await?
        }
    };

    match outcome {
        StartOutcome::Completed(summary) => println!("{}", summary.notice().message),
        StartOutcome::Paused => println!("Paused"),
        StartOutcome::Empty => println!("No files to add"),
        StartOutcome::AlreadyRunning | StartOutcome::Busy => warn!("Another batch is running"),
    }
    print_session(&queue.session());
    Ok(())
}

pub fn list(store: &JsonShortcutStore) -> Result<()> {
    for shortcut in store.list() {
        println!(
            "{}\t{}\t{}",
            shortcut.name,
            shortcut.file_path.display(),
            shortcut.category_id.as_deref().unwrap_or("-")
        );
    }
    info!("{} shortcut(s) in {}", store.len(), store.path().display());
    Ok(())
}

/// Split one stdin line into the paths of a drop.
fn parse_drop(line: &str) -> Vec<PathBuf> {
    line.split('\t')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn print_session(session: &BatchSession) {
    for item in &session.items {
        match (&item.status, &item.error_detail) {
            (ItemStatus::Error, Some(detail)) => {
                println!("{:<10} {}: {}", item.status.as_str(), item.display_name, detail)
            }
            _ => println!("{:<10} {}", item.status.as_str(), item.display_name),
        }
    }
}
