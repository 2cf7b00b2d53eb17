//! [`FakeCatalog`], an in-memory [`CatalogApi`] for collector, executor and
//! scanner tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use pano_model::{FieldDefinition, Model, VirtualDataSource};
use pano_remote::{
    CatalogApi, Error, JobRequest, JobState, JobStatus, Page, PhysicalDataSource, Result,
    ScannedColumn, ScannedTable,
};
use serde_json::{Value, json};

/// In-memory catalog for a single company.
///
/// Jobs complete after a configurable number of `RUNNING` polls. Names
/// registered with [`FakeCatalog::fail_on`] make writes of that entity, or
/// column scans of that table, fail.
///
/// # Example
///
/// ```rust,no_run
/// use pano_model::VirtualDataSource;
/// use pano_test_utils::FakeCatalog;
///
/// let catalog = FakeCatalog::new()
///     .with_data_source(VirtualDataSource::new("sales", "Sales"))
///     .fail_on("broken");
/// assert_eq!(catalog.data_source_count(), 1);
/// ```
#[derive(Default)]
pub struct FakeCatalog {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    companies: Vec<String>,
    sources: Vec<PhysicalDataSource>,
    data_sources: BTreeMap<String, VirtualDataSource>,
    models: BTreeMap<(String, String), Model>,
    /// Keyed by (dataset slug or empty for company scope, slug)
    fields: BTreeMap<(String, String), FieldDefinition>,
    tables: Vec<ScannedTable>,
    columns: Vec<ScannedColumn>,
    identifiers: BTreeMap<String, Vec<String>>,
    failing: BTreeSet<String>,
    running_polls: usize,
    jobs: BTreeMap<String, (JobRequest, usize)>,
    calls: Vec<String>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(self, edit: impl FnOnce(&mut Inner)) -> Self {
        edit(&mut *self.inner.lock().unwrap());
        self
    }

    pub fn with_company(self, slug: &str) -> Self {
        self.with(|inner| inner.companies.push(slug.to_string()))
    }

    pub fn with_source(self, source_name: &str) -> Self {
        self.with(|inner| {
            inner.sources.push(PhysicalDataSource {
                source_name: source_name.to_string(),
                source_type: None,
            })
        })
    }

    pub fn with_data_source(self, data_source: VirtualDataSource) -> Self {
        self.with(|inner| {
            inner
                .data_sources
                .insert(data_source.dataset_slug.clone(), data_source);
        })
    }

    /// Add a model; it must be assigned to a dataset.
    pub fn with_model(self, model: Model) -> Self {
        self.with(|inner| {
            inner
                .models
                .insert((model.dataset().to_string(), model.model_name.clone()), model);
        })
    }

    pub fn with_field(self, field: FieldDefinition) -> Self {
        self.with(|inner| {
            let key = (
                field.virtual_data_source.clone().unwrap_or_default(),
                field.slug.clone(),
            );
            inner.fields.insert(key, field);
        })
    }

    /// Add a scannable table. `table_schema` includes the connection name,
    /// columns are `(name, data type)` pairs.
    pub fn with_table(self, table_schema: &str, table_name: &str, columns: &[(&str, &str)]) -> Self {
        self.with(|inner| {
            inner.tables.push(ScannedTable {
                table_schema: table_schema.to_string(),
                table_name: table_name.to_string(),
            });
            for (column_name, data_type) in columns {
                inner.columns.push(ScannedColumn {
                    table_schema: table_schema.to_string(),
                    table_name: table_name.to_string(),
                    column_name: column_name.to_string(),
                    data_type: data_type.to_string(),
                });
            }
        })
    }

    /// Identifiers returned for a table, keyed by its connection-less name.
    pub fn with_identifiers(self, table: &str, identifiers: &[&str]) -> Self {
        self.with(|inner| {
            inner.identifiers.insert(
                table.to_string(),
                identifiers.iter().map(|id| id.to_string()).collect(),
            );
        })
    }

    /// Polls answered with `RUNNING` before each job completes.
    pub fn with_running_polls(self, polls: usize) -> Self {
        self.with(|inner| inner.running_polls = polls)
    }

    pub fn fail_on(self, name: &str) -> Self {
        self.with(|inner| {
            inner.failing.insert(name.to_string());
        })
    }

    /// Every call made so far, e.g. `PUT model sales.orders`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn data_source(&self, slug: &str) -> Option<VirtualDataSource> {
        self.inner.lock().unwrap().data_sources.get(slug).cloned()
    }

    pub fn model(&self, dataset: &str, name: &str) -> Option<Model> {
        let key = (dataset.to_string(), name.to_string());
        self.inner.lock().unwrap().models.get(&key).cloned()
    }

    pub fn field(&self, dataset: Option<&str>, slug: &str) -> Option<FieldDefinition> {
        let key = (dataset.unwrap_or_default().to_string(), slug.to_string());
        self.inner.lock().unwrap().fields.get(&key).cloned()
    }

    pub fn data_source_count(&self) -> usize {
        self.inner.lock().unwrap().data_sources.len()
    }

    pub fn model_count(&self) -> usize {
        self.inner.lock().unwrap().models.len()
    }

    pub fn field_count(&self) -> usize {
        self.inner.lock().unwrap().fields.len()
    }
}

impl Inner {
    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn check(&self, method: &str, name: &str) -> Result<()> {
        if self.failing.contains(name) {
            return Err(injected(method, name));
        }
        Ok(())
    }
}

fn injected(method: &str, name: &str) -> Error {
    Error::Status {
        method: method.to_string(),
        url: format!("fake://catalog/{}", name),
        status: 500,
        message: "injected failure".to_string(),
        request_id: Some("fake-request-id".to_string()),
    }
}

fn window<T>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items.skip(page.offset).take(page.limit).collect()
}

fn sourceless(schema: &str, table: &str) -> String {
    ScannedTable {
        table_schema: schema.to_string(),
        table_name: table.to_string(),
    }
    .sourceless_name()
}

/// `PREFIX%` matches by prefix, anything else must match exactly.
fn matches_filter(name: &str, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(filter) => match filter.strip_suffix('%') {
            Some(prefix) => name.to_uppercase().starts_with(&prefix.to_uppercase()),
            None => name.eq_ignore_ascii_case(filter),
        },
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn companies(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().unwrap().companies.clone())
    }

    async fn physical_data_sources(&self, _company: &str) -> Result<Vec<PhysicalDataSource>> {
        Ok(self.inner.lock().unwrap().sources.clone())
    }

    async fn data_sources(&self, _company: &str, page: Page) -> Result<Vec<VirtualDataSource>> {
        let inner = self.inner.lock().unwrap();
        Ok(window(inner.data_sources.values().cloned(), page))
    }

    async fn upsert_data_source(&self, _company: &str, data_source: &VirtualDataSource) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check("PUT", &data_source.dataset_slug)?;
        inner.record(format!("PUT data source {}", data_source.dataset_slug));
        inner
            .data_sources
            .insert(data_source.dataset_slug.clone(), data_source.clone());
        Ok(())
    }

    async fn delete_data_source(&self, _company: &str, dataset_slug: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check("DELETE", dataset_slug)?;
        inner.record(format!("DELETE data source {}", dataset_slug));
        inner.data_sources.remove(dataset_slug);
        Ok(())
    }

    async fn models(&self, _company: &str, dataset_slug: &str, page: Page) -> Result<Vec<Model>> {
        let inner = self.inner.lock().unwrap();
        let models = inner
            .models
            .iter()
            .filter(|((dataset, _), _)| dataset == dataset_slug)
            .map(|(_, model)| model.clone());
        Ok(window(models, page))
    }

    async fn upsert_model(&self, _company: &str, model: &Model) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check("PUT", &model.model_name)?;
        inner.record(format!("PUT model {}.{}", model.dataset(), model.model_name));
        inner
            .models
            .insert((model.dataset().to_string(), model.model_name.clone()), model.clone());
        Ok(())
    }

    async fn delete_model(&self, _company: &str, dataset_slug: &str, model_name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check("DELETE", model_name)?;
        inner.record(format!("DELETE model {}.{}", dataset_slug, model_name));
        inner
            .models
            .remove(&(dataset_slug.to_string(), model_name.to_string()));
        Ok(())
    }

    async fn fields(
        &self,
        _company: &str,
        dataset_slug: Option<&str>,
        page: Page,
    ) -> Result<Vec<FieldDefinition>> {
        let inner = self.inner.lock().unwrap();
        let scope = dataset_slug.unwrap_or_default();
        let fields = inner
            .fields
            .iter()
            .filter(|((dataset, _), _)| dataset == scope)
            .map(|(_, field)| field.clone());
        Ok(window(fields, page))
    }

    async fn upsert_field(&self, _company: &str, field: &FieldDefinition) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check("PUT", &field.slug)?;
        let dataset = field.virtual_data_source.clone().unwrap_or_default();
        inner.record(format!("PUT field {}", field.slug));
        inner.fields.insert((dataset, field.slug.clone()), field.clone());
        Ok(())
    }

    async fn delete_field(&self, _company: &str, dataset_slug: Option<&str>, slug: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check("DELETE", slug)?;
        inner.record(format!("DELETE field {}", slug));
        inner
            .fields
            .remove(&(dataset_slug.unwrap_or_default().to_string(), slug.to_string()));
        Ok(())
    }

    async fn start_job(&self, _company: &str, request: &JobRequest) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        let job_id = format!("job-{}", inner.jobs.len() + 1);
        inner.record(format!("JOB {}", request.label()));
        let polls = inner.running_polls;
        inner.jobs.insert(job_id.clone(), (request.clone(), polls));
        Ok(job_id)
    }

    async fn job_status(&self, _company: &str, job_id: &str) -> Result<JobStatus> {
        let mut inner = self.inner.lock().unwrap();
        let failing = inner.failing.clone();
        let Some((request, remaining)) = inner.jobs.get_mut(job_id) else {
            return Err(Error::Status {
                method: "GET".to_string(),
                url: format!("fake://catalog/metadata/jobs/{}", job_id),
                status: 404,
                message: "no such job".to_string(),
                request_id: None,
            });
        };

        let status = if *remaining > 0 {
            *remaining -= 1;
            JobState::Running
        } else {
            match request {
                JobRequest::ScanColumns { table_filter, .. } if failing.contains(table_filter.as_str()) => {
                    JobState::Failed
                }
                _ => JobState::Completed,
            }
        };

        Ok(JobStatus {
            job_id: job_id.to_string(),
            status,
        })
    }

    async fn job_results(&self, _company: &str, job_id: &str, page: Page) -> Result<Vec<Value>> {
        let inner = self.inner.lock().unwrap();
        let Some((request, _)) = inner.jobs.get(job_id) else {
            return Ok(Vec::new());
        };

        let rows: Vec<Value> = match request {
            JobRequest::ScanTables { table_filter, .. } => inner
                .tables
                .iter()
                .filter(|t| matches_filter(&t.sourceless_name(), table_filter.as_deref()))
                .map(|t| json!(t))
                .collect(),
            JobRequest::ScanColumns { table_filter, .. } => inner
                .columns
                .iter()
                .filter(|c| sourceless(&c.table_schema, &c.table_name) == *table_filter)
                .map(|c| json!(c))
                .collect(),
            JobRequest::GenerateIdentifiers { table_name, .. } => inner
                .identifiers
                .get(table_name)
                .map(|ids| vec![json!({"table_name": table_name, "identifiers": ids})])
                .unwrap_or_default(),
            JobRequest::RefreshTable { .. } => Vec::new(),
        };

        Ok(window(rows.into_iter(), page))
    }
}
