//! Remote metadata catalog access for the pano CLI
//!
//! - [`CatalogApi`]: the catalog operations, implemented over HTTP by
//!   [`HttpCatalog`]
//! - [`RemoteCollector`]: reads a company's catalog into a
//!   [`State`](pano_core::State)
//! - [`RemoteExecutor`]: applies actions to the catalog
//! - [`Scanner`]: drives metadata scan jobs and writes scanned models
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pano_remote::{ApiSettings, HttpCatalog, RemoteCollector};
//!
//! let api = Arc::new(HttpCatalog::new(ApiSettings::from_env()?, credentials)?);
//! let remote = RemoteCollector::new(api, "acme").read_state().await?;
//! ```

pub mod api;
pub mod client;
pub mod collector;
pub mod error;
pub mod executor;
pub mod scan;
pub mod settings;
pub mod wire;

pub use api::{CatalogApi, paginate};
pub use client::{HttpCatalog, REQUEST_ID_HEADER};
pub use collector::RemoteCollector;
pub use error::{Error, Result};
pub use executor::RemoteExecutor;
pub use scan::{
    DEFAULT_SCAN_PARALLELISM, NoScanProgress, ScanOptions, ScanProgress, ScanReport, Scanner, TableScan,
    models_from_columns,
};
pub use settings::ApiSettings;
pub use wire::{
    JobRequest, JobState, JobStatus, Page, PhysicalDataSource, ScannedColumn, ScannedTable,
};
