//! User configuration and repository context
//!
//! - [`UserConfig`] / [`Credentials`]: `~/.pano/config.yaml`, overridable
//!   through `PANO_CLIENT_ID` and `PANO_CLIENT_SECRET`
//! - [`Connection`]: named warehouse connections stored in the same file
//! - [`RepoContext`]: `./pano.yaml`, naming the company a repository syncs with
//!
//! Both are loaded once by the command layer and passed down explicitly.

mod auth;
mod connection;
mod context;

pub use auth::{AuthSection, CLIENT_ID_ENV, CLIENT_SECRET_ENV, Credentials, UserConfig};
pub use connection::{Connection, ConnectionUpdate, PASSWORD_MASK};
pub use context::RepoContext;
