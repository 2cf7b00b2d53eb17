//! The closed set of entities and the capability they share

use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::data_source::VirtualDataSource;
use crate::error::{Error, Result};
use crate::field::FieldDefinition;
use crate::identity::{EntityKind, IdentityKey};
use crate::model::Model;

/// Arbitrary extra attributes carried by a document.
///
/// A sorted map, so key order in the source text never affects equality.
pub type Metadata = BTreeMap<String, serde_yaml::Value>;

/// Capability shared by every entity that can be reconciled.
pub trait Actionable: Serialize + DeserializeOwned + Clone + PartialEq {
    const KIND: EntityKind;

    /// Identity key used to match the entity across states.
    fn identity(&self) -> IdentityKey;

    /// The document as written inside its package, with attributes that
    /// the package directory already implies removed.
    fn without_location(&self) -> Self {
        self.clone()
    }

    /// Parse the canonical YAML document.
    fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|source| Error::Document {
            kind: Self::KIND.label(),
            source,
        })
    }

    /// Render the canonical YAML document.
    fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|source| Error::Document {
            kind: Self::KIND.label(),
            source,
        })
    }
}

/// Any reconcilable entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    DataSource(VirtualDataSource),
    Field(FieldDefinition),
    Model(Model),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::DataSource(_) => EntityKind::DataSource,
            Self::Field(_) => EntityKind::Field,
            Self::Model(_) => EntityKind::Model,
        }
    }

    pub fn identity(&self) -> IdentityKey {
        match self {
            Self::DataSource(ds) => ds.identity(),
            Self::Field(field) => field.identity(),
            Self::Model(model) => model.identity(),
        }
    }

    /// Dataset slug owning this entity; empty for company-scoped fields.
    pub fn dataset(&self) -> &str {
        match self {
            Self::DataSource(ds) => &ds.dataset_slug,
            Self::Field(field) => field.virtual_data_source.as_deref().unwrap_or_default(),
            Self::Model(model) => model.dataset(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        match self {
            Self::DataSource(ds) => ds.to_yaml(),
            Self::Field(field) => field.to_yaml(),
            Self::Model(model) => model.to_yaml(),
        }
    }
}

impl From<VirtualDataSource> for Entity {
    fn from(ds: VirtualDataSource) -> Self {
        Self::DataSource(ds)
    }
}

impl From<FieldDefinition> for Entity {
    fn from(field: FieldDefinition) -> Self {
        Self::Field(field)
    }
}

impl From<Model> for Entity {
    fn from(model: Model) -> Self {
        Self::Model(model)
    }
}
