//! Cache management commands

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::cache::CacheStorage;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::formatters::{format_epoch_local, format_size};

/// Show cache status/statistics
pub fn status(format: OutputFormat) -> Result<()> {
    let cache = CacheStorage::open()?;
    let stats = cache.stats()?;
    let path = cache.db_path().display().to_string();

    match format {
        OutputFormat::Json => {
            let by_operation: serde_json::Map<String, serde_json::Value> = stats
                .by_operation
                .iter()
                .map(|(op, count)| (op.clone(), serde_json::Value::from(*count)))
                .collect();
            let json = serde_json::json!({
                "total_entries": stats.total_entries,
                "valid_entries": stats.valid_entries,
                "expired_entries": stats.expired_entries,
                "total_size_bytes": stats.total_size_bytes,
                "total_size_human": format_size(stats.total_size_bytes),
                "oldest_entry_timestamp": stats.oldest_entry,
                "newest_entry_timestamp": stats.newest_entry,
                "by_operation": by_operation,
                "path": path,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("{}", "Cache Status".bold());
            println!("────────────────────────────────────────");
            println!("Location:       {}", path.cyan());
            println!("Valid entries:  {}", stats.valid_entries);
            println!("Expired:        {}", stats.expired_entries);
            println!("Total size:     {}", format_size(stats.total_size_bytes));

            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_epoch_local(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_epoch_local(newest));
            }
            for (operation, count) in &stats.by_operation {
                println!("  {:<24}{}", operation, count);
            }
        }
    }

    Ok(())
}

/// Clear all cache entries, asking first unless `yes`
pub fn clear(format: OutputFormat, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Remove all cached drug lookups?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let cache = CacheStorage::open()?;
    let stats = cache.clear_all()?;
    report_removed(format, stats.entries_removed, "Cache was already empty")
}

/// Drop expired entries
pub fn purge(format: OutputFormat) -> Result<()> {
    let cache = CacheStorage::open()?;
    let stats = cache.purge_expired()?;
    report_removed(format, stats.entries_removed, "No expired entries")
}

/// Show cache path
pub fn path() -> Result<()> {
    let path = CacheStorage::cache_dir()?;
    println!("{}", path.display());
    Ok(())
}

fn report_removed(format: OutputFormat, removed: usize, none_message: &str) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ if removed > 0 => println!("{} Removed {} cache entries", "✓".green(), removed),
        _ => println!("{}", none_message),
    }
    Ok(())
}
