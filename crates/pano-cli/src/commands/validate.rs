//! Local document validation

use std::path::Path;

use colored::Colorize;
use pano_core::LocalCollector;

use crate::error::{CliError, Result};

/// Fail with every problem in the local documents printed.
///
/// Run before anything reads the local state for a sync, so an unreadable
/// document never turns into a delete.
pub fn check_local_state(root: &Path) -> Result<()> {
    let errors = LocalCollector::new(root).validate();
    if errors.is_empty() {
        return Ok(());
    }

    eprintln!("{} Local documents are invalid:", "ERROR".red().bold());
    for error in &errors {
        eprintln!("   {} {}", "!".red(), error);
    }
    Err(CliError::user(format!(
        "Found {} invalid document(s). Fix them and try again.",
        errors.len()
    )))
}

/// Run the validate command
pub fn run_validate(root: &Path) -> Result<()> {
    println!("{} Validating local documents...", "=>".blue().bold());
    check_local_state(root)?;
    println!("{} All local documents are valid.", "OK".green().bold());
    Ok(())
}
