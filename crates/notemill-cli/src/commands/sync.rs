//! Sync command implementation

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use notemill_core::{NotionFetcher, sync_workspace};
use std::path::Path;
use std::time::Instant;

use super::{load_config, open_storage};

/// Pull the whole workspace and write the snapshot.
pub async fn execute(
    config_path: Option<&Path>,
    concurrency: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let token = config.token()?;
    let fetcher = NotionFetcher::new(&token)?
        .with_base_url(config.notion.api_url.clone())
        .with_page_size(config.notion.page_size);
    let storage = open_storage(&config)?;
    let concurrency = concurrency.unwrap_or(config.sync.concurrency);

    let start = Instant::now();
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        create_spinner("Syncing workspace...")
    };

    let outcome = sync_workspace(&fetcher, &storage, concurrency).await?;
    pb.finish_and_clear();

    if !quiet {
        println!(
            "{} {} entries from {} pages in {:.1}s",
            "Synced".green().bold(),
            outcome.entries,
            outcome.pages,
            start.elapsed().as_secs_f64()
        );
        println!(
            "  {} carried, {} fresh, {} databases skipped",
            outcome.carried,
            outcome.fresh.to_string().green(),
            outcome.databases
        );
        if outcome.pages_failed > 0 {
            println!(
                "  {} pages failed (see log for details)",
                outcome.pages_failed.to_string().red()
            );
        }
        println!(
            "  snapshot: {}",
            storage.snapshot_path().display().to_string().bright_black()
        );
    }

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}
