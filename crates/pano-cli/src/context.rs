//! What remote commands need before they run
//!
//! Credentials are checked first, then `pano.yaml`, so a missing config file
//! is reported before a missing context.

use std::path::Path;
use std::sync::Arc;

use pano_core::{Credentials, RepoContext, UserConfig};
use pano_fs::NormalizedPath;
use pano_remote::{ApiSettings, CatalogApi, HttpCatalog, RemoteCollector, RemoteExecutor, Scanner};
use tracing::debug;

use crate::error::Result;

/// A catalog client bound to the company of the current directory.
pub struct Remote<A> {
    pub api: Arc<A>,
    pub company: String,
    pub settings: ApiSettings,
}

impl<A: CatalogApi + 'static> Remote<A> {
    pub fn new(api: Arc<A>, company: impl Into<String>, settings: ApiSettings) -> Self {
        Self {
            api,
            company: company.into(),
            settings,
        }
    }

    pub fn collector(&self) -> RemoteCollector<A> {
        RemoteCollector::new(Arc::clone(&self.api), self.company.as_str())
            .with_page_size(self.settings.page_size)
            .with_concurrency(self.settings.collect_concurrency)
    }

    pub fn executor(&self) -> RemoteExecutor<A> {
        RemoteExecutor::new(Arc::clone(&self.api), self.company.as_str())
    }

    pub fn scanner(&self, source_id: &str) -> Scanner<A> {
        Scanner::new(Arc::clone(&self.api), self.company.as_str(), source_id).with_settings(&self.settings)
    }
}

impl Remote<HttpCatalog> {
    /// Connect with the configured credentials for the company in
    /// `root/pano.yaml`.
    pub fn open(root: &Path) -> Result<Self> {
        let api = connect()?;
        let context = RepoContext::load(&NormalizedPath::new(root))?;
        debug!(company = %context.company_slug, "opened remote session");
        let settings = api.settings().clone();
        Ok(Self::new(api, context.company_slug, settings))
    }
}

/// Build an API client from the configured credentials.
pub fn connect() -> Result<Arc<HttpCatalog>> {
    let credentials = Credentials::from_env_or_file(&UserConfig::default_path()?)?;
    let settings = ApiSettings::from_env()?;
    debug!(api_url = %settings.api_url, "connecting to catalog");
    Ok(Arc::new(HttpCatalog::new(settings, credentials)?))
}
