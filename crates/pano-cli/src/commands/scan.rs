//! Metadata scan command

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use pano_core::LocalExecutor;
use pano_remote::{CatalogApi, ScanOptions, TableScan};

use crate::context::Remote;
use crate::error::Result;
use crate::progress::ScanBar;

/// Run the scan command
///
/// Writes one model per scanned table into `scanned/`. Tables that fail are
/// reported and do not fail the command.
pub async fn run_scan<A: CatalogApi + 'static>(
    root: &Path,
    remote: &Remote<A>,
    source_id: &str,
    options: &ScanOptions,
) -> Result<()> {
    let scanner = remote.scanner(source_id);
    scanner.ensure_source_exists().await?;

    println!(
        "{} Scanning tables of {}...",
        "=>".blue().bold(),
        source_id.cyan()
    );

    let writer = LocalExecutor::new(root);
    let report = scanner.scan_all(options, &writer, Arc::new(ScanBar::new())).await?;

    if report.tables.is_empty() {
        println!("{} No tables have been found", "OK".green().bold());
        return Ok(());
    }

    for scan in &report.tables {
        match scan {
            TableScan::Written { models, .. } => {
                for model in models {
                    println!("   {} Discovered model {}", "+".green(), model);
                }
            }
            TableScan::Failed { message, .. } => {
                println!("   {} {}", "!".yellow(), message);
            }
        }
    }
    println!(
        "{} Scanned {} tables",
        "OK".green().bold(),
        report.tables.len()
    );
    Ok(())
}
