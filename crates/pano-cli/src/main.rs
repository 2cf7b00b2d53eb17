//! pano CLI
//!
//! Syncs a directory of YAML data models with the Panoramic metadata catalog.

mod cli;
mod commands;
mod context;
mod error;
mod progress;
mod signal;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use pano_core::UserConfig;
use pano_remote::ScanOptions;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FieldAction};
use context::Remote;
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    signal::install_exit_handler();

    if let Err(e) = run(cli).await {
        report_error(&e);
        std::process::exit(1);
    }
}

/// Log to stderr. `--debug` wins over `RUST_LOG`; otherwise only errors are
/// shown.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init();
}

fn report_error(error: &dyn std::error::Error) {
    eprintln!("{}: {}", "error".red().bold(), error);
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
        source = cause.source();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Some(cmd) => execute_command(cmd, &cwd).await,
        None => {
            println!(
                "{} Sync data models with the Panoramic catalog",
                "pano".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "pano --help".cyan());
            Ok(())
        }
    }
}

async fn execute_command(cmd: Commands, root: &Path) -> Result<()> {
    tracing::debug!(command = ?cmd, root = %root.display(), "running command");

    match cmd {
        Commands::Scan {
            source_id,
            filter,
            generate_identifiers,
            parallel,
        } => {
            let options = ScanOptions {
                filter,
                parallel,
                generate_identifiers,
            };
            commands::run_scan(root, &Remote::open(root)?, &source_id, &options).await
        }
        Commands::Pull { apply } => commands::run_pull(root, &Remote::open(root)?, apply).await,
        Commands::Push { apply } => commands::run_push(root, &Remote::open(root)?, apply).await,
        Commands::Configure {
            client_id,
            client_secret,
        } => commands::run_configure(&UserConfig::default_path()?, client_id, client_secret),
        Commands::Connection { action } => {
            commands::run_connection(&UserConfig::default_path()?, action)
        }
        Commands::Init { company } => {
            let company = match company {
                Some(company) => company,
                None => commands::choose_company(context::connect()?.as_ref()).await?,
            };
            commands::run_init(root, &company)
        }
        Commands::ListConnections => commands::run_list_connections(&Remote::open(root)?).await,
        Commands::ListCompanies => commands::run_list_companies(context::connect()?.as_ref()).await,
        Commands::Validate => commands::run_validate(root),
        Commands::Field {
            action: FieldAction::Scaffold { apply },
        } => commands::run_field_scaffold(root, apply).await,
    }
}
