//! The catalog API seam
//!
//! [`CatalogApi`] is implemented over HTTP by
//! [`HttpCatalog`](crate::HttpCatalog) and in memory by the test fake. Every
//! call is scoped by a company slug.

use std::future::Future;

use async_trait::async_trait;
use pano_model::{FieldDefinition, Model, VirtualDataSource};
use serde_json::Value;

use crate::Result;
use crate::wire::{JobRequest, JobStatus, Page, PhysicalDataSource};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Slugs of the companies the credentials can access.
    async fn companies(&self) -> Result<Vec<String>>;

    async fn physical_data_sources(&self, company: &str) -> Result<Vec<PhysicalDataSource>>;

    async fn data_sources(&self, company: &str, page: Page) -> Result<Vec<VirtualDataSource>>;

    async fn upsert_data_source(&self, company: &str, data_source: &VirtualDataSource) -> Result<()>;

    /// Deleting a data source that does not exist succeeds.
    async fn delete_data_source(&self, company: &str, dataset_slug: &str) -> Result<()>;

    async fn models(&self, company: &str, dataset_slug: &str, page: Page) -> Result<Vec<Model>>;

    async fn upsert_model(&self, company: &str, model: &Model) -> Result<()>;

    /// Deleting a model that does not exist succeeds.
    async fn delete_model(&self, company: &str, dataset_slug: &str, model_name: &str) -> Result<()>;

    /// Field definitions of a dataset, or company scoped ones for `None`.
    async fn fields(&self, company: &str, dataset_slug: Option<&str>, page: Page)
    -> Result<Vec<FieldDefinition>>;

    async fn upsert_field(&self, company: &str, field: &FieldDefinition) -> Result<()>;

    /// Deleting a field that does not exist succeeds.
    async fn delete_field(&self, company: &str, dataset_slug: Option<&str>, slug: &str) -> Result<()>;

    /// Start a metadata job and return its id.
    async fn start_job(&self, company: &str, request: &JobRequest) -> Result<String>;

    async fn job_status(&self, company: &str, job_id: &str) -> Result<JobStatus>;

    async fn job_results(&self, company: &str, job_id: &str, page: Page) -> Result<Vec<Value>>;
}

/// Fetch every page of a listing.
///
/// A page shorter than the page size ends the listing.
pub async fn paginate<T, F, Fut>(page_size: usize, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Page) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = Page::first(page_size.max(1));

    loop {
        let batch = fetch(page).await?;
        let received = batch.len();
        items.extend(batch);
        if received < page.limit {
            return Ok(items);
        }
        page = page.next(received);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn paginate_stops_on_short_page() {
        let data: Vec<u32> = (0..7).collect();
        let mut calls = Vec::new();

        let items = paginate(3, |page| {
            calls.push(page.offset);
            let batch: Vec<u32> = data.iter().copied().skip(page.offset).take(page.limit).collect();
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items, data);
        assert_eq!(calls, vec![0, 3, 6]);
    }

    #[tokio::test]
    async fn paginate_requests_one_more_page_after_a_full_one() {
        let mut calls = 0;
        let items: Vec<u32> = paginate(2, |page| {
            calls += 1;
            async move { Ok(if page.offset == 0 { vec![1, 2] } else { Vec::new() }) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(calls, 2);
    }
}
