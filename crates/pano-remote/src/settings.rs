//! Client settings resolved from the environment

use std::time::Duration;

use crate::{Error, Result};

pub const API_URL_ENV: &str = "PANO_API_URL";
pub const AUTH_URL_ENV: &str = "PANO_AUTH_URL";

pub const DEFAULT_API_URL: &str = "https://diesel.panoramichq.com/api/v1";
pub const DEFAULT_AUTH_URL: &str = "https://id.panoramichq.com/oauth2/default/v1/token";

/// Entities fetched per page when listing the catalog.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Datasets fetched in parallel while collecting the remote state.
pub const DEFAULT_COLLECT_CONCURRENCY: usize = 4;

/// Where and how the catalog is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Base URL of the catalog API, without a trailing slash
    pub api_url: String,
    /// OAuth token endpoint
    pub auth_url: String,
    pub page_size: usize,
    pub collect_concurrency: usize,
    pub request_timeout: Duration,
    /// Delay between metadata job status checks
    pub job_poll_interval: Duration,
    /// Longest time to wait for a metadata job
    pub job_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            collect_concurrency: DEFAULT_COLLECT_CONCURRENCY,
            request_timeout: Duration::from_secs(30),
            job_poll_interval: Duration::from_secs(1),
            job_timeout: Duration::from_secs(300),
        }
    }
}

impl ApiSettings {
    /// Defaults overridden by `PANO_API_URL` and `PANO_AUTH_URL`.
    pub fn resolve<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(url) = env(API_URL_ENV).filter(|v| !v.is_empty()) {
            settings.api_url = checked_url(API_URL_ENV, &url)?;
        }
        if let Some(url) = env(AUTH_URL_ENV).filter(|v| !v.is_empty()) {
            settings.auth_url = checked_url(AUTH_URL_ENV, &url)?;
        }
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Absolute URL of an API path such as `/models`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn checked_url(name: &str, url: &str) -> Result<String> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Settings {
            name: name.to_string(),
            message: format!("'{}' is not an http(s) URL", url),
        });
    }
    Ok(url.trim_end_matches('/').to_string())
}
