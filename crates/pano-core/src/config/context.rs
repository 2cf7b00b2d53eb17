//! Repository context document (`pano.yaml`)

use pano_fs::{ConfigStore, NormalizedPath, PanoPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn default_api_version() -> String {
    pano_model::DEFAULT_API_VERSION.to_string()
}

/// The company a model repository is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoContext {
    pub company_slug: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl RepoContext {
    pub fn new(company_slug: impl Into<String>) -> Self {
        Self {
            company_slug: company_slug.into(),
            api_version: default_api_version(),
        }
    }

    pub fn path_in(root: &NormalizedPath) -> NormalizedPath {
        root.join(PanoPath::ContextFile)
    }

    /// Load `pano.yaml` from `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContextNotFound`] when the file does not exist.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = Self::path_in(root);
        if !path.exists() {
            return Err(Error::ContextNotFound {
                path: path.to_native(),
            });
        }

        let context: Self = ConfigStore::new().load(&path)?;
        if context.company_slug.trim().is_empty() {
            return Err(Error::InvalidConfig {
                path: path.to_native(),
                message: "company_slug must not be empty".into(),
            });
        }
        Ok(context)
    }

    pub fn save(&self, root: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(&Self::path_in(root), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_through_pano_yaml() {
        let dir = TempDir::new().unwrap();
        let root = NormalizedPath::new(dir.path());

        RepoContext::new("company_name_12fxs").save(&root).unwrap();

        let content = std::fs::read_to_string(dir.path().join("pano.yaml")).unwrap();
        assert_eq!(content, "company_slug: company_name_12fxs\napi_version: v1\n");
        assert_eq!(RepoContext::load(&root).unwrap().company_slug, "company_name_12fxs");
    }

    #[test]
    fn other_api_version_is_kept() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("pano.yaml"),
            "api_version: v2\ncompany_slug: acme\n",
        )
        .unwrap();

        let context = RepoContext::load(&NormalizedPath::new(dir.path())).unwrap();
        assert_eq!(context.api_version, "v2");
    }

    #[test]
    fn missing_context_points_to_init() {
        let dir = TempDir::new().unwrap();
        let err = RepoContext::load(&NormalizedPath::new(dir.path())).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Context file (pano.yaml) not found in current working directory. Run pano init to create it."
        );
    }
}
