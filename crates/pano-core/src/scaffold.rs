//! Field definitions for model fields that have none

use std::collections::BTreeMap;

use pano_model::{Entity, FieldDefinition, FieldType, IdentityKey};

use crate::state::State;

/// Data type given to scaffolded fields whose model field has none.
pub const DEFAULT_DATA_TYPE: &str = "text";

/// A field definition to create, with the package it belongs in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldedField {
    pub field: FieldDefinition,
    pub package: Option<String>,
}

/// Find every `field_map` slug used by a model in `state` that has neither a
/// dataset-scoped nor a company-scoped definition.
///
/// Each missing slug yields one dimension definition in the model's dataset,
/// in key order.
pub fn missing_fields(state: &State) -> Vec<ScaffoldedField> {
    let mut missing: BTreeMap<IdentityKey, ScaffoldedField> = BTreeMap::new();

    for (_, entry) in state.iter() {
        let Entity::Model(model) = entry.entity() else {
            continue;
        };
        let dataset = model.dataset();

        for field in &model.fields {
            for slug in &field.field_map {
                let key = IdentityKey::field(Some(dataset), slug.as_str());
                let defined = state.contains(&key) || state.contains(&IdentityKey::field(None, slug.as_str()));
                if defined || missing.contains_key(&key) {
                    continue;
                }

                let data_type = field.data_type.as_deref().unwrap_or(DEFAULT_DATA_TYPE);
                let definition = FieldDefinition::new(slug.as_str(), FieldType::Dimension, data_type)
                    .in_dataset(dataset);
                missing.insert(
                    key,
                    ScaffoldedField {
                        field: definition,
                        package: entry.package().map(str::to_string),
                    },
                );
            }
        }
    }

    missing.into_values().collect()
}
