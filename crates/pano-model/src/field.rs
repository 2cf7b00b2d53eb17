//! Field definition documents - `fields/<slug>.field.yaml`
//!
//! Company-scoped definitions live in the repository root `fields/`
//! directory, dataset-scoped ones inside the package's `fields/` directory.
//!
//! # Example YAML
//!
//! ```yaml
//! api_version: v1
//! data_type: money
//! display_name: Revenue
//! field_type: metric
//! group: Custom
//! slug: revenue
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::{Actionable, Metadata};
use crate::identity::{EntityKind, IdentityKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Dimension,
    Metric,
}

/// Attributes are declared in key order, so documents are written with
/// sorted keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(default = "crate::default_api_version")]
    pub api_version: String,
    pub data_type: String,
    pub display_name: String,
    pub field_type: FieldType,
    pub group: String,
    pub slug: String,
    /// Owning dataset; `None` for company scope. Implied by location on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_data_source: Option<String>,
    #[serde(flatten)]
    pub extra: Metadata,
}

impl FieldDefinition {
    pub fn new(
        slug: impl Into<String>,
        field_type: FieldType,
        data_type: impl Into<String>,
    ) -> Self {
        let slug = slug.into();
        Self {
            api_version: crate::default_api_version(),
            display_name: slug.clone(),
            slug,
            virtual_data_source: None,
            group: "CLI".to_string(),
            field_type,
            data_type: data_type.into(),
            extra: Metadata::new(),
        }
    }

    /// Scope this definition to a dataset.
    pub fn in_dataset(mut self, dataset_slug: impl Into<String>) -> Self {
        self.virtual_data_source = Some(dataset_slug.into());
        self
    }
}

impl Actionable for FieldDefinition {
    const KIND: EntityKind = EntityKind::Field;

    fn identity(&self) -> IdentityKey {
        IdentityKey::field(self.virtual_data_source.as_deref(), &self.slug)
    }

    fn without_location(&self) -> Self {
        Self {
            virtual_data_source: None,
            ..self.clone()
        }
    }
}
