//! Model documents - `<package>/<model_name>.model.yaml`
//!
//! # Example YAML
//!
//! ```yaml
//! api_version: v1
//! model_name: test_model
//! data_source: pano_snowflake_66.snowflake_sample_data.tpch_sf1.nation
//! fields:
//!   - field_map:
//!       - name
//!     data_reference: '"N_NAME"'
//! joins:
//!   - to_model: other_model
//!     relationship: many_to_one
//!     join_type: left
//!     fields:
//!       - name
//! identifiers:
//!   - name
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entity::{Actionable, Metadata};
use crate::identity::{EntityKind, IdentityKey};

/// A table-like object mapped onto a physical data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default = "crate::default_api_version")]
    pub api_version: String,
    /// Unique within its dataset
    pub model_name: String,
    /// Owning dataset slug. Implied by the package directory on disk,
    /// explicit on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_data_source: Option<String>,
    /// Fully qualified physical table reference
    pub data_source: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<Join>,
    /// Field names forming the business key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(flatten)]
    pub extra: Metadata,
}

/// A column mapping owned by a [`Model`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Raw-column aliases. Order carries no meaning.
    pub field_map: BTreeSet<String>,
    /// Physical column expression
    pub data_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(flatten)]
    pub extra: Metadata,
}

/// A join to another model. The order of `fields` forms a compound predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub to_model: String,
    pub relationship: Relationship,
    pub join_type: JoinType,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl Model {
    pub fn new(model_name: impl Into<String>, data_source: impl Into<String>) -> Self {
        Self {
            api_version: crate::default_api_version(),
            model_name: model_name.into(),
            virtual_data_source: None,
            data_source: data_source.into(),
            fields: Vec::new(),
            joins: Vec::new(),
            identifiers: Vec::new(),
            extra: Metadata::new(),
        }
    }

    /// Assign the model to a dataset.
    pub fn in_dataset(mut self, dataset_slug: impl Into<String>) -> Self {
        self.virtual_data_source = Some(dataset_slug.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn with_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifiers = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Owning dataset slug, empty when unassigned.
    pub fn dataset(&self) -> &str {
        self.virtual_data_source.as_deref().unwrap_or_default()
    }
}

impl Field {
    pub fn new<I, S>(field_map: I, data_reference: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_map: field_map.into_iter().map(Into::into).collect(),
            data_reference: data_reference.into(),
            data_type: None,
            extra: Metadata::new(),
        }
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }
}

impl Actionable for Model {
    const KIND: EntityKind = EntityKind::Model;

    fn identity(&self) -> IdentityKey {
        IdentityKey::model(self.dataset(), &self.model_name)
    }

    fn without_location(&self) -> Self {
        Self {
            virtual_data_source: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEST_MODEL: &str = r#"
api_version: v1
model_name: test_model
data_source: pano_snowflake_66.snowflake_sample_data.tpch_sf1.nation
fields:
  - field_map:
      - name
    data_reference: '"N_NAME"'
joins:
  - to_model: other_model
    relationship: many_to_one
    join_type: left
    fields:
      - name
identifiers:
  - name
"#;

    #[test]
    fn parses_model_document() {
        let model = Model::from_yaml(TEST_MODEL).unwrap();

        let expected = Model::new(
            "test_model",
            "pano_snowflake_66.snowflake_sample_data.tpch_sf1.nation",
        )
        .with_field(Field::new(["name"], "\"N_NAME\""))
        .with_join(Join {
            to_model: "other_model".into(),
            relationship: Relationship::ManyToOne,
            join_type: JoinType::Left,
            fields: vec!["name".into()],
        })
        .with_identifiers(["name"]);

        assert_eq!(model, expected);
    }

    #[test]
    fn field_map_order_is_not_semantic() {
        let a = Field::new(["nation_name", "name"], "\"N_NAME\"");
        let b = Field::new(["name", "nation_name"], "\"N_NAME\"");
        assert_eq!(a, b);
    }

    #[test]
    fn field_order_is_semantic() {
        let f1 = Field::new(["a"], "A");
        let f2 = Field::new(["b"], "B");
        let m1 = Model::new("m", "t").with_field(f1.clone()).with_field(f2.clone());
        let m2 = Model::new("m", "t").with_field(f2).with_field(f1);
        assert_ne!(m1, m2);
    }

    #[test]
    fn identity_uses_dataset() {
        let model = Model::new("m1", "db.t").in_dataset("ds1");
        assert_eq!(model.identity(), IdentityKey::model("ds1", "m1"));
        assert_eq!(model.without_location().dataset(), "");
    }

    #[test]
    fn unknown_join_type_is_rejected() {
        let yaml = r#"
model_name: m
data_source: t
joins:
  - to_model: o
    relationship: many_to_one
    join_type: sideways
    fields: [a]
"#;
        assert!(Model::from_yaml(yaml).is_err());
    }
}
