//! Listing commands for data connections and companies

use std::io::Write;

use colored::Colorize;
use pano_remote::CatalogApi;

use crate::context::Remote;
use crate::error::Result;

/// Run the list-connections command
pub async fn run_list_connections<A: CatalogApi + 'static>(remote: &Remote<A>) -> Result<()> {
    let sources = remote.api.physical_data_sources(&remote.company).await?;
    let lines: Vec<String> = sources
        .iter()
        .map(|source| match &source.source_type {
            Some(source_type) => format!("{} {}", source.source_name.green(), format!("({})", source_type).dimmed()),
            None => source.source_name.green().to_string(),
        })
        .collect();
    print_listing(&mut std::io::stdout(), &mut std::io::stderr(), &lines, "No data connections have been found")
}

/// Run the list-companies command
pub async fn run_list_companies<A: CatalogApi>(api: &A) -> Result<()> {
    let companies = api.companies().await?;
    let lines: Vec<String> = companies.iter().map(|company| company.green().to_string()).collect();
    print_listing(&mut std::io::stdout(), &mut std::io::stderr(), &lines, "No companies have been found")
}

/// One line per item on `out`, or the `empty` notice on `err`.
fn print_listing(out: &mut impl Write, err: &mut impl Write, lines: &[String], empty: &str) -> Result<()> {
    if lines.is_empty() {
        writeln!(err, "{} {}", "!".yellow().bold(), empty)?;
        return Ok(());
    }
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pano_remote::ApiSettings;
    use pano_test_utils::FakeCatalog;

    #[tokio::test]
    async fn lists_connections_and_companies() {
        let catalog = FakeCatalog::new().with_company("acme").with_source("SF");
        run_list_companies(&catalog).await.unwrap();

        let remote = Remote::new(Arc::new(catalog), "acme", ApiSettings::default());
        run_list_connections(&remote).await.unwrap();
    }

    #[test]
    fn empty_listing_goes_to_stderr() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        print_listing(&mut out, &mut err, &[], "No companies have been found").unwrap();

        assert!(out.is_empty());
        assert!(String::from_utf8(err).unwrap().contains("No companies have been found"));
    }

    #[test]
    fn listing_goes_to_stdout() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        print_listing(&mut out, &mut err, &["acme".to_string(), "beta".to_string()], "none").unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "acme\nbeta\n");
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn empty_listings_succeed() {
        let catalog = FakeCatalog::new();
        run_list_companies(&catalog).await.unwrap();

        let remote = Remote::new(Arc::new(catalog), "acme", ApiSettings::default());
        run_list_connections(&remote).await.unwrap();
    }
}
