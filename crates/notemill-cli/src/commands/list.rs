//! List command implementation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::{load_config, open_storage};

/// Print the entries in the current snapshot.
pub fn execute(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let storage = open_storage(&config)?;

    let Some(entries) = storage.load_snapshot()? else {
        if json {
            println!("[]");
        } else {
            println!("No snapshot found. Run 'notemill sync' first.");
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if let Some(meta) = storage.load_meta()? {
        println!(
            "{} entries from {} pages, fetched {}",
            meta.entry_count,
            meta.page_count,
            meta.fetched_at.to_rfc3339().bright_black()
        );
    }

    for indexed in &entries {
        println!(
            "{} {} {}",
            format!("[{}]", indexed.id).cyan(),
            indexed.entry.heading.bold(),
            indexed.entry.file.bright_black()
        );
        println!("  {}", preview(&indexed.entry.compiled));
    }

    Ok(())
}

/// First line of the compiled text, clipped for terminal display.
fn preview(compiled: &str) -> String {
    let line = compiled
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default();
    let mut out: String = line.chars().take(80).collect();
    if line.chars().count() > 80 {
        out.push('…');
    }
    out
}
