//! HTTP implementation of [`CatalogApi`]

use async_trait::async_trait;
use pano_core::Credentials;
use pano_model::{FieldDefinition, Model, VirtualDataSource};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::settings::ApiSettings;
use crate::wire::{
    Envelope, JobCreated, JobRequest, JobStatus, Page, PhysicalDataSource, TokenResponse,
};
use crate::{Error, Result};

/// Response header carrying the catalog's request id.
pub const REQUEST_ID_HEADER: &str = "x-diesel-request-id";

/// Catalog client over HTTPS.
///
/// Holds one bearer token, fetched on first use. A 401 answer drops the
/// token and the request is retried once with a fresh one.
pub struct HttpCatalog {
    http: reqwest::Client,
    settings: ApiSettings,
    credentials: Credentials,
    token: Mutex<Option<String>>,
}

impl HttpCatalog {
    pub fn new(settings: ApiSettings, credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(concat!("pano/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Http {
                url: settings.api_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            settings,
            credentials,
            token: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Current token, fetching one when none is held.
    async fn token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(token) = token.as_ref() {
            return Ok(token.clone());
        }

        let fresh = self.fetch_token().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    async fn invalidate_token(&self) {
        self.token.lock().await.take();
    }

    async fn fetch_token(&self) -> Result<String> {
        let url = &self.settings.auth_url;
        debug!(url = %url, "fetching access token");

        let response = self
            .http
            .post(url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let request_id = request_id(&response);
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth {
                message: format!("{} {}", status, truncate(&body)),
                request_id,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|source| Error::Http {
            url: url.clone(),
            source,
        })?;
        Ok(token.access_token)
    }

    /// Send a request built by `build`, retrying once after a 401.
    async fn send<F>(&self, method: Method, url: &str, build: F) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut retried = false;
        loop {
            let token = self.token().await?;
            debug!(method = %method, url = %url, "catalog request");

            let request = build(self.http.request(method.clone(), url)).bearer_auth(&token);
            let response = request.send().await.map_err(|source| Error::Http {
                url: url.to_string(),
                source,
            })?;

            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                warn!(url = %url, "access token rejected, fetching a new one");
                self.invalidate_token().await;
                retried = true;
                continue;
            }

            return check_status(&method, url, response).await;
        }
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.settings.endpoint(path);
        let response = self.send(Method::GET, &url, |r| r.query(query)).await?;
        decode(&url, response).await
    }

    async fn put_json(&self, path: &str, query: &[(&str, String)], body: &Value) -> Result<()> {
        let url = self.settings.endpoint(path);
        self.send(Method::PUT, &url, |r| r.query(query).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let url = self.settings.endpoint(path);
        match self.send(Method::DELETE, &url, |r| r.query(query)).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(url = %url, "already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn company_query(company: &str) -> Vec<(&'static str, String)> {
    vec![("company_slug", company.to_string())]
}

fn paged_query(company: &str, page: Page) -> Vec<(&'static str, String)> {
    let mut query = company_query(company);
    query.push(("offset", page.offset.to_string()));
    query.push(("limit", page.limit.to_string()));
    query
}

fn request_id(response: &Response) -> Option<String> {
    response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn truncate(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(idx, _)| idx)
        .unwrap_or(body.len());
    &body[..end]
}

async fn check_status(method: &Method, url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let request_id = request_id(&response);
    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        message: truncate(body.trim()).to_string(),
        request_id,
    })
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(|source| Error::Http {
        url: url.to_string(),
        source,
    })?;
    let envelope: Envelope<T> =
        serde_json::from_slice(&bytes).map_err(|e| Error::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        })?;
    Ok(envelope.data)
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn companies(&self) -> Result<Vec<String>> {
        self.get_data("/companies", &[]).await
    }

    async fn physical_data_sources(&self, company: &str) -> Result<Vec<PhysicalDataSource>> {
        self.get_data("/physical-data-sources", &company_query(company)).await
    }

    async fn data_sources(&self, company: &str, page: Page) -> Result<Vec<VirtualDataSource>> {
        self.get_data("/virtual-data-sources", &paged_query(company, page)).await
    }

    async fn upsert_data_source(&self, company: &str, data_source: &VirtualDataSource) -> Result<()> {
        let body = serde_json::to_value(data_source)?;
        self.put_json("/virtual-data-sources", &company_query(company), &body).await
    }

    async fn delete_data_source(&self, company: &str, dataset_slug: &str) -> Result<()> {
        self.delete(&format!("/virtual-data-sources/{}", dataset_slug), &company_query(company))
            .await
    }

    async fn models(&self, company: &str, dataset_slug: &str, page: Page) -> Result<Vec<Model>> {
        let mut query = paged_query(company, page);
        query.push(("virtual_data_source", dataset_slug.to_string()));
        self.get_data("/models", &query).await
    }

    async fn upsert_model(&self, company: &str, model: &Model) -> Result<()> {
        let body = serde_json::to_value(model)?;
        self.put_json("/models", &company_query(company), &body).await
    }

    async fn delete_model(&self, company: &str, dataset_slug: &str, model_name: &str) -> Result<()> {
        let mut query = company_query(company);
        query.push(("virtual_data_source", dataset_slug.to_string()));
        self.delete(&format!("/models/{}", model_name), &query).await
    }

    async fn fields(
        &self,
        company: &str,
        dataset_slug: Option<&str>,
        page: Page,
    ) -> Result<Vec<FieldDefinition>> {
        let mut query = paged_query(company, page);
        if let Some(dataset) = dataset_slug {
            query.push(("virtual_data_source", dataset.to_string()));
        }
        self.get_data("/fields", &query).await
    }

    async fn upsert_field(&self, company: &str, field: &FieldDefinition) -> Result<()> {
        let body = serde_json::to_value(field)?;
        self.put_json("/fields", &company_query(company), &body).await
    }

    async fn delete_field(&self, company: &str, dataset_slug: Option<&str>, slug: &str) -> Result<()> {
        let mut query = company_query(company);
        if let Some(dataset) = dataset_slug {
            query.push(("virtual_data_source", dataset.to_string()));
        }
        self.delete(&format!("/fields/{}", slug), &query).await
    }

    async fn start_job(&self, company: &str, request: &JobRequest) -> Result<String> {
        let url = self.settings.endpoint("/metadata/jobs");
        let body = serde_json::to_value(request)?;
        let query = company_query(company);
        let response = self
            .send(Method::POST, &url, |r| r.query(&query).json(&body))
            .await?;
        let created: JobCreated = decode(&url, response).await?;
        debug!(job_id = %created.job_id, job = %request.label(), "started metadata job");
        Ok(created.job_id)
    }

    async fn job_status(&self, company: &str, job_id: &str) -> Result<JobStatus> {
        self.get_data(&format!("/metadata/jobs/{}", job_id), &company_query(company))
            .await
    }

    async fn job_results(&self, company: &str, job_id: &str, page: Page) -> Result<Vec<Value>> {
        self.get_data(
            &format!("/metadata/jobs/{}/results", job_id),
            &paged_query(company, page),
        )
        .await
    }
}
