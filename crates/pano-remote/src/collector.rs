//! Collecting the remote catalog into a [`State`]

use std::sync::Arc;

use async_trait::async_trait;
use pano_core::{State, StateBuilder, StateCollector};
use pano_model::{FieldDefinition, Model, VirtualDataSource};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::api::{CatalogApi, paginate};
use crate::settings::{DEFAULT_COLLECT_CONCURRENCY, DEFAULT_PAGE_SIZE};
use crate::{Error, Result};

/// Models and fields of one dataset.
struct DatasetContents {
    models: Vec<Model>,
    fields: Vec<FieldDefinition>,
}

/// Reads every data source, model and field definition of a company.
///
/// Datasets are fetched concurrently, bounded by `concurrency`. Any failure
/// fails the whole collection.
pub struct RemoteCollector<A> {
    api: Arc<A>,
    company: String,
    page_size: usize,
    concurrency: usize,
}

impl<A: CatalogApi + 'static> RemoteCollector<A> {
    pub fn new(api: Arc<A>, company: impl Into<String>) -> Self {
        Self {
            api,
            company: company.into(),
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: DEFAULT_COLLECT_CONCURRENCY,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn read_state(&self) -> Result<State> {
        let api = self.api.as_ref();
        let company = self.company.as_str();

        let data_sources: Vec<VirtualDataSource> =
            paginate(self.page_size, |page| api.data_sources(company, page)).await?;
        let company_fields: Vec<FieldDefinition> =
            paginate(self.page_size, |page| api.fields(company, None, page)).await?;
        debug!(
            company,
            datasets = data_sources.len(),
            fields = company_fields.len(),
            "fetched remote datasets"
        );

        let contents = self.fetch_datasets(&data_sources).await?;

        let mut builder = StateBuilder::new(format!("remote catalog of {}", company));
        for field in company_fields {
            builder.insert(
                FieldDefinition {
                    virtual_data_source: None,
                    ..field
                },
                None,
            )?;
        }
        for (data_source, contents) in data_sources.into_iter().zip(contents) {
            let dataset = data_source.dataset_slug.clone();
            builder.insert(data_source, None)?;
            for model in contents.models {
                builder.insert(model.in_dataset(dataset.as_str()), None)?;
            }
            for field in contents.fields {
                builder.insert(field.in_dataset(dataset.as_str()), None)?;
            }
        }

        Ok(builder.build())
    }

    /// Fetch models and fields of every dataset, in the order given.
    async fn fetch_datasets(&self, data_sources: &[VirtualDataSource]) -> Result<Vec<DatasetContents>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (idx, data_source) in data_sources.iter().enumerate() {
            let api = Arc::clone(&self.api);
            let semaphore = Arc::clone(&semaphore);
            let company = self.company.clone();
            let dataset = data_source.dataset_slug.clone();
            let page_size = self.page_size;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| Error::Worker {
                    message: e.to_string(),
                })?;
                debug!(dataset = %dataset, "fetching dataset contents");

                let api = api.as_ref();
                let models = paginate(page_size, |page| api.models(&company, &dataset, page)).await?;
                let fields =
                    paginate(page_size, |page| api.fields(&company, Some(&dataset), page)).await?;
                Ok::<_, Error>((idx, DatasetContents { models, fields }))
            });
        }

        let mut slots: Vec<Option<DatasetContents>> = data_sources.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (idx, contents) = joined.map_err(|e| Error::Worker {
                message: e.to_string(),
            })??;
            slots[idx] = Some(contents);
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| Error::Worker {
                    message: "dataset fetch did not complete".to_string(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl<A: CatalogApi + 'static> StateCollector for RemoteCollector<A> {
    type Error = Error;

    async fn collect(&self) -> Result<State> {
        self.read_state().await
    }
}
