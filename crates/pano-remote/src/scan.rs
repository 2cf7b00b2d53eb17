//! Metadata scans of a physical data connection
//!
//! A scan lists the tables matching a filter, then for every table refreshes
//! its metadata, reads its columns and turns them into a [`Model`] written to
//! `scanned/`. Tables are processed concurrently; a failing table is reported
//! and skipped.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use pano_core::LocalExecutor;
use pano_model::{Field, Model};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::{CatalogApi, paginate};
use crate::settings::{ApiSettings, DEFAULT_PAGE_SIZE};
use crate::wire::{GeneratedIdentifiers, JobRequest, JobState, ScannedColumn, ScannedTable};
use crate::{Error, Result};

/// Tables scanned in parallel unless told otherwise.
pub const DEFAULT_SCAN_PARALLELISM: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Table filter understood by the metadata service, e.g. `SCHEMA.TABLE%`
    pub filter: Option<String>,
    pub parallel: usize,
    pub generate_identifiers: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            filter: None,
            parallel: DEFAULT_SCAN_PARALLELISM,
            generate_identifiers: false,
        }
    }
}

/// Outcome of scanning one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableScan {
    /// Model names written for the table
    Written { table: String, models: Vec<String> },
    Failed { table: String, message: String },
}

impl TableScan {
    pub fn table(&self) -> &str {
        match self {
            Self::Written { table, .. } | Self::Failed { table, .. } => table,
        }
    }
}

/// Everything a scan did, tables in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub tables: Vec<TableScan>,
}

impl ScanReport {
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().flat_map(|scan| match scan {
            TableScan::Written { models, .. } => models.iter().map(String::as_str).collect::<Vec<_>>(),
            TableScan::Failed { .. } => Vec::new(),
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &TableScan> {
        self.tables.iter().filter(|scan| matches!(scan, TableScan::Failed { .. }))
    }
}

/// Observer of scan progress, shared by the table workers.
pub trait ScanProgress: Send + Sync {
    fn start(&self, _tables: usize) {}

    fn table_finished(&self, _scan: &TableScan) {}

    fn finish(&self) {}
}

/// A [`ScanProgress`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScanProgress;

impl ScanProgress for NoScanProgress {}

/// Drives metadata jobs for one data connection of one company.
pub struct Scanner<A> {
    api: Arc<A>,
    company: String,
    source_id: String,
    page_size: usize,
    poll_interval: Duration,
    job_timeout: Duration,
}

impl<A> Clone for Scanner<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            company: self.company.clone(),
            source_id: self.source_id.clone(),
            page_size: self.page_size,
            poll_interval: self.poll_interval,
            job_timeout: self.job_timeout,
        }
    }
}

impl<A: CatalogApi + 'static> Scanner<A> {
    pub fn new(api: Arc<A>, company: impl Into<String>, source_id: impl Into<String>) -> Self {
        let defaults = ApiSettings::default();
        Self {
            api,
            company: company.into(),
            source_id: source_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: defaults.job_poll_interval,
            job_timeout: defaults.job_timeout,
        }
    }

    /// Take paging and job timing from `settings`.
    pub fn with_settings(mut self, settings: &ApiSettings) -> Self {
        self.page_size = settings.page_size.max(1);
        self.poll_interval = settings.job_poll_interval;
        self.job_timeout = settings.job_timeout;
        self
    }

    pub fn with_job_timing(mut self, poll_interval: Duration, job_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.job_timeout = job_timeout;
        self
    }

    /// Fail unless the data connection exists for the company.
    pub async fn ensure_source_exists(&self) -> Result<()> {
        let sources = self.api.physical_data_sources(&self.company).await?;
        if sources.iter().any(|s| s.source_name == self.source_id) {
            Ok(())
        } else {
            Err(Error::SourceNotFound {
                source_id: self.source_id.clone(),
            })
        }
    }

    pub async fn scan_tables(&self, filter: Option<&str>) -> Result<Vec<ScannedTable>> {
        self.run_job(JobRequest::ScanTables {
            source_id: self.source_id.clone(),
            table_filter: filter.map(str::to_string),
        })
        .await
    }

    pub async fn refresh_table(&self, table_name: &str) -> Result<()> {
        let _: Vec<serde_json::Value> = self
            .run_job(JobRequest::RefreshTable {
                source_id: self.source_id.clone(),
                table_name: table_name.to_string(),
            })
            .await?;
        Ok(())
    }

    pub async fn scan_columns(&self, table_name: &str) -> Result<Vec<ScannedColumn>> {
        self.run_job(JobRequest::ScanColumns {
            source_id: self.source_id.clone(),
            table_filter: table_name.to_string(),
        })
        .await
    }

    pub async fn generate_identifiers(&self, table_name: &str) -> Result<Vec<String>> {
        let rows: Vec<GeneratedIdentifiers> = self
            .run_job(JobRequest::GenerateIdentifiers {
                source_id: self.source_id.clone(),
                table_name: table_name.to_string(),
            })
            .await?;
        Ok(rows.into_iter().flat_map(|row| row.identifiers).collect())
    }

    /// Scan every table matching the options and write one model per table
    /// through `writer`.
    ///
    /// Fails only when the table listing fails; per-table failures are
    /// recorded in the report.
    pub async fn scan_all(
        &self,
        options: &ScanOptions,
        writer: &LocalExecutor,
        progress: Arc<dyn ScanProgress>,
    ) -> Result<ScanReport> {
        let tables = self.scan_tables(options.filter.as_deref()).await?;
        debug!(source = %self.source_id, tables = tables.len(), "tables to scan");
        progress.start(tables.len());

        let semaphore = Arc::new(Semaphore::new(options.parallel.max(1)));
        let mut workers = JoinSet::new();

        for table in tables {
            let scanner = self.clone();
            let writer = writer.clone();
            let semaphore = Arc::clone(&semaphore);
            let progress = Arc::clone(&progress);
            let identifiers = options.generate_identifiers;

            workers.spawn(async move {
                let table_name = table.sourceless_name();
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => scanner.scan_table(&table_name, identifiers, &writer).await,
                    Err(e) => Err(Error::Worker {
                        message: e.to_string(),
                    }),
                };

                let scan = match outcome {
                    Ok(models) => TableScan::Written {
                        table: table_name,
                        models,
                    },
                    Err(e) => {
                        warn!(table = %table_name, error = %e, "metadata scan failed");
                        TableScan::Failed {
                            message: format!("Metadata could not be scanned for table {}", table_name),
                            table: table_name,
                        }
                    }
                };
                progress.table_finished(&scan);
                scan
            });
        }

        let mut report = ScanReport::default();
        while let Some(joined) = workers.join_next().await {
            let scan = joined.map_err(|e| Error::Worker {
                message: e.to_string(),
            })?;
            report.tables.push(scan);
        }
        report.tables.sort_by(|a, b| a.table().cmp(b.table()));

        progress.finish();
        Ok(report)
    }

    async fn scan_table(
        &self,
        table_name: &str,
        generate_identifiers: bool,
        writer: &LocalExecutor,
    ) -> Result<Vec<String>> {
        self.refresh_table(table_name).await?;
        let columns = self.scan_columns(table_name).await?;

        let mut written = Vec::new();
        for mut model in models_from_columns(&columns) {
            if generate_identifiers {
                model.identifiers = self
                    .generate_identifiers(table_name)
                    .await?
                    .into_iter()
                    .map(|id| id.to_lowercase())
                    .collect();
            }
            let path = writer.write_scanned_model(&model)?;
            debug!(model = %model.model_name, path = %path, "wrote scanned model");
            written.push(model.model_name);
        }
        Ok(written)
    }

    /// Start a job, wait for it and read all of its result rows.
    async fn run_job<T: DeserializeOwned>(&self, request: JobRequest) -> Result<Vec<T>> {
        let job_id = self.api.start_job(&self.company, &request).await?;
        self.wait_for(&job_id, &request).await?;

        let api = self.api.as_ref();
        let company = self.company.as_str();
        let rows = paginate(self.page_size, |page| api.job_results(company, &job_id, page)).await?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(Error::from))
            .collect()
    }

    async fn wait_for(&self, job_id: &str, request: &JobRequest) -> Result<()> {
        let started = Instant::now();
        loop {
            let status = self.api.job_status(&self.company, job_id).await?;
            match status.status {
                JobState::Completed => return Ok(()),
                JobState::Failed => {
                    return Err(Error::JobFailed {
                        job_id: job_id.to_string(),
                        job: request.label(),
                    });
                }
                JobState::Running if started.elapsed() >= self.job_timeout => {
                    return Err(Error::Timeout {
                        job_id: job_id.to_string(),
                        job: request.label(),
                        seconds: self.job_timeout.as_secs(),
                    });
                }
                JobState::Running => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

/// Group scanned columns by table and build one model per table.
///
/// Names are lower-cased; the column name, quoted, is the data reference.
pub fn models_from_columns(columns: &[ScannedColumn]) -> Vec<Model> {
    let mut tables: BTreeMap<String, Vec<&ScannedColumn>> = BTreeMap::new();
    for column in columns {
        let table = format!("{}.{}", column.table_schema, column.table_name).to_lowercase();
        tables.entry(table).or_default().push(column);
    }

    tables
        .into_iter()
        .map(|(table, columns)| {
            columns.into_iter().fold(Model::new(table.as_str(), table.as_str()), |model, column| {
                model.with_field(
                    Field::new([column.column_name.to_lowercase()], format!("\"{}\"", column.column_name))
                        .with_data_type(column.data_type.to_lowercase()),
                )
            })
        })
        .collect()
}
