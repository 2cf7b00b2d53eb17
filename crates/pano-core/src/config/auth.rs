//! Client credentials

use std::collections::BTreeMap;

use pano_fs::{ConfigStore, NormalizedPath, PanoPath};
use pano_model::Metadata;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::connection::Connection;
use crate::{Error, Result};

pub const CLIENT_ID_ENV: &str = "PANO_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "PANO_CLIENT_SECRET";

/// Contents of `~/.pano/config.yaml`.
///
/// Older files keep `client_id` and `client_secret` at the top level; a
/// complete pair is moved under `auth` when loaded. Sections this crate does
/// not know are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSection>,
    /// Named data warehouse connections
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connections: BTreeMap<String, Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_secret: Option<String>,
    #[serde(flatten)]
    pub extra: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSection {
    pub client_id: String,
    pub client_secret: String,
}

impl UserConfig {
    pub fn with_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set_credentials(client_id, client_secret);
        config
    }

    /// Replace the `auth` section, dropping any legacy top-level credentials.
    pub fn set_credentials(&mut self, client_id: impl Into<String>, client_secret: impl Into<String>) {
        self.auth = Some(AuthSection {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        });
        self.client_id = None;
        self.client_secret = None;
    }

    /// `~/.pano/config.yaml`
    pub fn default_path() -> Result<NormalizedPath> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(NormalizedPath::new(home)
            .join(PanoPath::ConfigDir)
            .join(PanoPath::ConfigFile))
    }

    /// Load the config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] when the file does not exist.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        }
        debug!(path = %path, "loading user config");
        let mut config: Self = ConfigStore::new().load(path)?;
        if config.auth.is_none() {
            if let (Some(client_id), Some(client_secret)) =
                (config.client_id.clone(), config.client_secret.clone())
            {
                config.set_credentials(client_id, client_secret);
            }
        }
        Ok(config)
    }

    /// Load the config file, or start an empty one when it does not exist yet.
    pub fn load_or_default(path: &NormalizedPath) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config file, creating `~/.pano` as needed.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    fn client_id(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .map(|a| a.client_id.as_str())
            .or(self.client_id.as_deref())
    }

    fn client_secret(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .map(|a| a.client_secret.as_str())
            .or(self.client_secret.as_deref())
    }
}

/// OAuth client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials from the environment, falling back to the config
    /// file at `path`.
    ///
    /// The file is only required when the environment does not provide both
    /// values.
    pub fn resolve<F>(path: &NormalizedPath, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |name: &str| env(name).filter(|value| !value.is_empty());
        let env_id = from_env(CLIENT_ID_ENV);
        let env_secret = from_env(CLIENT_SECRET_ENV);

        if let (Some(client_id), Some(client_secret)) = (env_id.clone(), env_secret.clone()) {
            debug!("using credentials from environment");
            return Ok(Self {
                client_id,
                client_secret,
            });
        }

        let config = UserConfig::load(path)?;
        let missing = |key: &str| Error::InvalidConfig {
            path: path.to_native(),
            message: format!("missing auth.{}", key),
        };

        let client_id = match env_id {
            Some(id) => id,
            None => config.client_id().ok_or_else(|| missing("client_id"))?.to_string(),
        };
        let client_secret = match env_secret {
            Some(secret) => secret,
            None => config
                .client_secret()
                .ok_or_else(|| missing("client_secret"))?
                .to_string(),
        };

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Resolve using the process environment.
    pub fn from_env_or_file(path: &NormalizedPath) -> Result<Self> {
        Self::resolve(path, |name| std::env::var(name).ok())
    }
}
