//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use pano_remote::DEFAULT_SCAN_PARALLELISM;

/// pano - Sync local data models with the Panoramic metadata catalog
#[derive(Parser, Debug)]
#[command(name = "pano")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print debug logs to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags shared by commands that change files or the catalog
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyArgs {
    /// Apply changes without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Preview changes without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Scan table metadata of a data connection into scanned/
    ///
    /// Examples:
    ///   pano scan SF                          # Every table of connection SF
    ///   pano scan SF -f 'METRICS.ADWORDS%'    # Tables matching a filter
    ///   pano scan SF -i -p 4                  # With identifiers, 4 at a time
    Scan {
        /// Name of the data connection
        source_id: String,

        /// Table filter, e.g. SCHEMA.TABLE or SCHEMA.PREFIX%
        #[arg(short, long)]
        filter: Option<String>,

        /// Generate model identifiers for every scanned table
        #[arg(short = 'i', long)]
        generate_identifiers: bool,

        /// Number of tables scanned in parallel
        #[arg(short, long, default_value_t = DEFAULT_SCAN_PARALLELISM)]
        parallel: usize,
    },

    /// Pull models from the catalog into this directory
    Pull {
        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Push local models to the catalog
    Push {
        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Store API client credentials in ~/.pano/config.yaml
    Configure {
        /// OAuth client id (prompted for when omitted)
        #[arg(long)]
        client_id: Option<String>,

        /// OAuth client secret (prompted for when omitted)
        #[arg(long)]
        client_secret: Option<String>,
    },

    /// Manage data warehouse connections stored in ~/.pano/config.yaml
    Connection {
        #[command(subcommand)]
        action: ConnectionAction,
    },

    /// Bind this directory to a company by writing pano.yaml
    Init {
        /// Company slug (prompted for when omitted)
        #[arg(long)]
        company: Option<String>,
    },

    /// List data connections of the company
    ListConnections,

    /// List companies the credentials can access
    ListCompanies,

    /// Check that every local document parses and is valid
    Validate,

    /// Manage field definitions
    Field {
        #[command(subcommand)]
        action: FieldAction,
    },
}

/// Field definition actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// Create definitions for model fields that have none
    Scaffold {
        #[command(flatten)]
        apply: ApplyArgs,
    },
}

/// Connection actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Add a named connection
    Create {
        /// Connection name
        name: String,

        #[command(flatten)]
        args: ConnectionArgs,
    },

    /// List connections, passwords masked
    List {
        /// Print passwords in clear text
        #[arg(long)]
        show_password: bool,
    },

    /// Change settings of a connection
    Update {
        /// Connection name
        name: String,

        #[command(flatten)]
        args: ConnectionArgs,
    },

    /// Delete a connection
    Remove {
        /// Connection name
        name: String,
    },
}

/// Connection settings; on update, omitted ones keep their value
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Warehouse type, e.g. postgres
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub database: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}
