//! Metadata scans against the in-memory catalog

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pano_core::{LocalCollector, LocalExecutor};
use pano_remote::{Error, ScanOptions, ScanProgress, Scanner, TableScan};
use pano_test_utils::{FakeCatalog, TestRepo};
use pretty_assertions::assert_eq;

fn catalog() -> FakeCatalog {
    FakeCatalog::new()
        .with_source("SF")
        .with_table(
            "SF.TPCH.SF1",
            "NATION",
            &[("N_NATIONKEY", "NUMBER"), ("N_NAME", "TEXT")],
        )
        .with_table("SF.TPCH.SF1", "REGION", &[("R_NAME", "TEXT")])
        .with_table("SF.TPCH.SF1", "CUSTOMER", &[("C_CUSTKEY", "NUMBER")])
        .with_running_polls(2)
}

fn scanner(catalog: FakeCatalog) -> (Arc<FakeCatalog>, Scanner<FakeCatalog>) {
    let api = Arc::new(catalog);
    let scanner = Scanner::new(Arc::clone(&api), "acme", "SF")
        .with_job_timing(Duration::from_millis(1), Duration::from_secs(5));
    (api, scanner)
}

#[derive(Default)]
struct Counter {
    started: AtomicUsize,
    finished_tables: AtomicUsize,
    finished: AtomicUsize,
}

impl ScanProgress for Counter {
    fn start(&self, tables: usize) {
        self.started.store(tables, Ordering::SeqCst);
    }

    fn table_finished(&self, _scan: &TableScan) {
        self.finished_tables.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn scan_writes_one_model_per_table() {
    let repo = TestRepo::new();
    let (_, scanner) = scanner(catalog());
    let progress = Arc::new(Counter::default());

    let report = scanner
        .scan_all(
            &ScanOptions {
                parallel: 2,
                ..ScanOptions::default()
            },
            &LocalExecutor::new(repo.root()),
            progress.clone(),
        )
        .await
        .unwrap();

    let tables: Vec<&str> = report.tables.iter().map(TableScan::table).collect();
    assert_eq!(tables, vec!["TPCH.SF1.CUSTOMER", "TPCH.SF1.NATION", "TPCH.SF1.REGION"]);
    assert_eq!(report.failures().count(), 0);
    assert_eq!(report.models().count(), 3);

    assert_eq!(progress.started.load(Ordering::SeqCst), 3);
    assert_eq!(progress.finished_tables.load(Ordering::SeqCst), 3);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);

    assert_eq!(
        repo.read("scanned/sf.tpch.sf1.nation.model.yaml"),
        "api_version: v1\nmodel_name: sf.tpch.sf1.nation\ndata_source: sf.tpch.sf1.nation\nfields:\n- field_map:\n  - n_nationkey\n  data_reference: '\"N_NATIONKEY\"'\n  data_type: number\n- field_map:\n  - n_name\n  data_reference: '\"N_NAME\"'\n  data_type: text\n"
    );
    // Scanned models are never part of the synced state
    assert!(LocalCollector::new(repo.root()).read_state().unwrap().is_empty());
}

#[tokio::test]
async fn filter_limits_the_tables() {
    let repo = TestRepo::new();
    let (_, scanner) = scanner(catalog());

    let report = scanner
        .scan_all(
            &ScanOptions {
                filter: Some("TPCH.SF1.NAT%".into()),
                ..ScanOptions::default()
            },
            &LocalExecutor::new(repo.root()),
            Arc::new(pano_remote::NoScanProgress),
        )
        .await
        .unwrap();

    assert_eq!(report.models().collect::<Vec<_>>(), vec!["sf.tpch.sf1.nation"]);
    repo.assert_file_not_exists("scanned/sf.tpch.sf1.region.model.yaml");
}

#[tokio::test]
async fn failing_table_is_reported_and_skipped() {
    let repo = TestRepo::new();
    let (_, scanner) = scanner(catalog().fail_on("TPCH.SF1.REGION"));

    let report = scanner
        .scan_all(
            &ScanOptions::default(),
            &LocalExecutor::new(repo.root()),
            Arc::new(pano_remote::NoScanProgress),
        )
        .await
        .unwrap();

    let failures: Vec<&TableScan> = report.failures().collect();
    assert_eq!(
        failures,
        vec![&TableScan::Failed {
            table: "TPCH.SF1.REGION".into(),
            message: "Metadata could not be scanned for table TPCH.SF1.REGION".into(),
        }]
    );
    repo.assert_file_exists("scanned/sf.tpch.sf1.nation.model.yaml");
    repo.assert_file_exists("scanned/sf.tpch.sf1.customer.model.yaml");
    repo.assert_file_not_exists("scanned/sf.tpch.sf1.region.model.yaml");
}

#[tokio::test]
async fn generated_identifiers_are_written_lower_case() {
    let repo = TestRepo::new();
    let (api, scanner) = scanner(catalog().with_identifiers("TPCH.SF1.NATION", &["N_NATIONKEY"]));

    scanner
        .scan_all(
            &ScanOptions {
                filter: Some("TPCH.SF1.NATION".into()),
                generate_identifiers: true,
                ..ScanOptions::default()
            },
            &LocalExecutor::new(repo.root()),
            Arc::new(pano_remote::NoScanProgress),
        )
        .await
        .unwrap();

    repo.assert_file_contains("scanned/sf.tpch.sf1.nation.model.yaml", "identifiers:\n- n_nationkey\n");
    assert!(api.calls().contains(&"JOB identifiers TPCH.SF1.NATION".to_string()));
}

#[tokio::test]
async fn unknown_source_is_rejected() {
    let api = Arc::new(catalog());
    let scanner = Scanner::new(api, "acme", "MISSING");

    let err = scanner.ensure_source_exists().await.unwrap_err();
    assert!(matches!(err, Error::SourceNotFound { ref source_id } if source_id == "MISSING"));
    assert_eq!(
        err.to_string(),
        "Data connection MISSING not found. Has it been connected?"
    );
}

#[tokio::test]
async fn known_source_is_accepted() {
    let (_, scanner) = scanner(catalog());
    scanner.ensure_source_exists().await.unwrap();
}

#[tokio::test]
async fn job_that_never_finishes_times_out() {
    let api = Arc::new(catalog().with_running_polls(usize::MAX));
    let scanner = Scanner::new(api, "acme", "SF")
        .with_job_timing(Duration::from_millis(1), Duration::from_millis(20));

    let err = scanner.scan_tables(None).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got: {}", err);
}
