//! Identity keys used to match entities across two states

use serde::{Deserialize, Serialize};

/// Kind of an entity.
///
/// The declaration order is the owner-before-dependent order: a dataset must
/// exist before its field definitions, and fields before the models that map
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    DataSource,
    Field,
    Model,
}

impl EntityKind {
    /// Human readable label used in action descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DataSource => "data source",
            Self::Field => "field",
            Self::Model => "model",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite identity: kind + package (dataset slug) + local name.
///
/// Company-scoped field definitions have an empty package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    kind: EntityKind,
    package: String,
    name: String,
}

impl IdentityKey {
    pub fn data_source(dataset_slug: impl Into<String>) -> Self {
        let slug = dataset_slug.into();
        Self {
            kind: EntityKind::DataSource,
            package: slug.clone(),
            name: slug,
        }
    }

    pub fn model(dataset_slug: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Model,
            package: dataset_slug.into(),
            name: model_name.into(),
        }
    }

    pub fn field(dataset_slug: Option<&str>, slug: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Field,
            package: dataset_slug.unwrap_or_default().to_string(),
            name: slug.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Dataset slug the entity belongs to; empty for company scope.
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            EntityKind::DataSource => write!(f, "{}", self.name),
            EntityKind::Field | EntityKind::Model if self.package.is_empty() => {
                write!(f, "{}", self.name)
            }
            EntityKind::Field | EntityKind::Model => write!(f, "{}.{}", self.package, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_order_is_owner_first() {
        assert!(EntityKind::DataSource < EntityKind::Field);
        assert!(EntityKind::Field < EntityKind::Model);
    }

    #[test]
    fn keys_sort_by_kind_then_package_then_name() {
        let mut keys = vec![
            IdentityKey::model("b", "m1"),
            IdentityKey::data_source("b"),
            IdentityKey::model("a", "m2"),
            IdentityKey::field(None, "revenue"),
            IdentityKey::data_source("a"),
        ];
        keys.sort();

        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["a", "b", "revenue", "a.m2", "b.m1"]);
    }

    #[test]
    fn display() {
        assert_eq!(IdentityKey::data_source("ds1").to_string(), "ds1");
        assert_eq!(IdentityKey::model("ds1", "m1").to_string(), "ds1.m1");
        assert_eq!(IdentityKey::field(Some("ds1"), "f").to_string(), "ds1.f");
        assert_eq!(IdentityKey::field(None, "f").to_string(), "f");
    }

    #[test]
    fn same_name_different_kind_are_distinct() {
        assert_ne!(IdentityKey::data_source("x"), IdentityKey::model("x", "x"));
    }
}
