//! Virtual data source (dataset) documents - `<package>/dataset.yaml`
//!
//! # Example YAML
//!
//! ```yaml
//! dataset_slug: sales
//! display_name: Sales
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::{Actionable, Metadata};
use crate::identity::{EntityKind, IdentityKey};

/// A dataset: the owner of a package of models and field definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualDataSource {
    #[serde(default = "crate::default_api_version")]
    pub api_version: String,
    /// Unique within a company
    pub dataset_slug: String,
    pub display_name: String,
    /// Any other attribute, preserved verbatim
    #[serde(flatten)]
    pub extra: Metadata,
}

impl VirtualDataSource {
    pub fn new(dataset_slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            api_version: crate::default_api_version(),
            dataset_slug: dataset_slug.into(),
            display_name: display_name.into(),
            extra: Metadata::new(),
        }
    }
}

impl Actionable for VirtualDataSource {
    const KIND: EntityKind = EntityKind::DataSource;

    fn identity(&self) -> IdentityKey {
        IdentityKey::data_source(&self.dataset_slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document_with_default_api_version() {
        let yaml = "dataset_slug: test_dataset\ndisplay_name: Test Dataset\n";
        let ds = VirtualDataSource::from_yaml(yaml).unwrap();

        assert_eq!(ds, VirtualDataSource::new("test_dataset", "Test Dataset"));
        assert_eq!(ds.api_version, "v1");
    }

    #[test]
    fn keeps_unknown_attributes() {
        let yaml = "dataset_slug: sales\ndisplay_name: Sales\ndescription: Revenue data\n";
        let ds = VirtualDataSource::from_yaml(yaml).unwrap();

        assert_eq!(
            ds.extra.get("description"),
            Some(&serde_yaml::Value::String("Revenue data".into()))
        );
        assert!(ds.to_yaml().unwrap().contains("description: Revenue data"));
    }
}
