//! Init command: bind a directory to a company

use std::path::Path;

use colored::Colorize;
use dialoguer::Input;
use pano_core::RepoContext;
use pano_fs::NormalizedPath;
use pano_remote::CatalogApi;

use crate::error::{CliError, Result};

/// Ask which company to use, defaulting to the first one available.
pub async fn choose_company<A: CatalogApi>(api: &A) -> Result<String> {
    let companies = api.companies().await?;
    let Some(first) = companies.first() else {
        return Err(CliError::user("No companies have been found"));
    };

    let company = Input::<String>::new()
        .with_prompt(company_prompt(&companies))
        .default(first.clone())
        .interact_text()?;
    Ok(company)
}

/// Prompt naming at most three of the available companies.
fn company_prompt(companies: &[String]) -> String {
    const SHOWN: usize = 3;
    let base = "Enter your company slug";
    match companies.len() {
        0 => base.to_string(),
        n if n > SHOWN => format!("{} (Available - {{{},...}})", base, companies[..SHOWN].join(",")),
        _ => format!("{} (Available - {{{}}})", base, companies.join(",")),
    }
}

/// Run the init command
///
/// Writes `pano.yaml` in `root`, replacing an existing one.
pub fn run_init(root: &Path, company_slug: &str) -> Result<()> {
    let company_slug = company_slug.trim();
    if company_slug.is_empty() {
        return Err(CliError::user("Company slug must not be empty"));
    }

    let root = NormalizedPath::new(root);
    RepoContext::new(company_slug).save(&root)?;

    println!(
        "{} Initialized {} for company {}",
        "OK".green().bold(),
        RepoContext::path_in(&root),
        company_slug.cyan()
    );
    Ok(())
}
