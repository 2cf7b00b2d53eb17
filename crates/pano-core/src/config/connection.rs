//! Named data warehouse connections kept in `~/.pano/config.yaml`

use serde::{Deserialize, Serialize};

use super::auth::UserConfig;
use crate::{Error, Result};

/// Shown instead of a password unless it is asked for explicitly.
pub const PASSWORD_MASK: &str = "*****";

/// One warehouse connection. Fields are declared in key order so the file
/// reads the same as a sorted dump.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub database: String,
    pub host: String,
    pub password: String,
    pub port: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub user: String,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("kind", &self.kind)
            .field("user", &self.user)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Connection {
    /// Copy with the password replaced by [`PASSWORD_MASK`].
    pub fn masked(&self) -> Self {
        Self {
            password: PASSWORD_MASK.to_string(),
            ..self.clone()
        }
    }
}

/// Partial change to a [`Connection`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionUpdate {
    pub kind: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub password: Option<String>,
}

impl ConnectionUpdate {
    pub fn apply_to(self, connection: &mut Connection) {
        let Self {
            kind,
            user,
            host,
            port,
            database,
            password,
        } = self;
        if let Some(kind) = kind {
            connection.kind = kind;
        }
        if let Some(user) = user {
            connection.user = user;
        }
        if let Some(host) = host {
            connection.host = host;
        }
        if let Some(port) = port {
            connection.port = port;
        }
        if let Some(database) = database {
            connection.database = database;
        }
        if let Some(password) = password {
            connection.password = password;
        }
    }
}

impl UserConfig {
    /// # Errors
    ///
    /// Returns [`Error::ConnectionExists`] when `name` is taken.
    pub fn add_connection(&mut self, name: &str, connection: Connection) -> Result<()> {
        if self.connections.contains_key(name) {
            return Err(Error::ConnectionExists { name: name.to_string() });
        }
        self.connections.insert(name.to_string(), connection);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::ConnectionNotFound`] for an unknown `name`.
    pub fn update_connection(&mut self, name: &str, update: ConnectionUpdate) -> Result<&Connection> {
        let connection = self
            .connections
            .get_mut(name)
            .ok_or_else(|| Error::ConnectionNotFound { name: name.to_string() })?;
        update.apply_to(connection);
        Ok(connection)
    }

    /// # Errors
    ///
    /// Returns [`Error::ConnectionNotFound`] for an unknown `name`.
    pub fn remove_connection(&mut self, name: &str) -> Result<Connection> {
        self.connections
            .remove(name)
            .ok_or_else(|| Error::ConnectionNotFound { name: name.to_string() })
    }
}
