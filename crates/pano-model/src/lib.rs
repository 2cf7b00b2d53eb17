//! Entity model for the pano CLI.
//!
//! Provides strongly-typed definitions of the documents kept in a model
//! repository and in the remote catalog:
//!
//! - [`VirtualDataSource`] - a dataset, one `dataset.yaml` per package
//! - [`Model`] - a table-like object with [`Field`]s, [`Join`]s and identifiers
//! - [`FieldDefinition`] - a company or dataset scoped field
//!
//! All of them are wrapped by the closed [`Entity`] sum type and addressed by
//! an [`IdentityKey`].

pub mod data_source;
pub mod entity;
pub mod error;
pub mod field;
pub mod identity;
pub mod model;
pub mod validation;

pub use data_source::VirtualDataSource;
pub use entity::{Actionable, Entity, Metadata};
pub use error::{Error, Result};
pub use field::{FieldDefinition, FieldType};
pub use identity::{EntityKind, IdentityKey};
pub use model::{Field, Join, JoinType, Model, Relationship};
pub use validation::ValidationIssue;

/// API version written into documents that do not specify one.
pub const DEFAULT_API_VERSION: &str = "v1";

pub(crate) fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}
