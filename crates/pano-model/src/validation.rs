//! Semantic checks for documents that parsed cleanly

use crate::data_source::VirtualDataSource;
use crate::entity::{Actionable, Entity};
use crate::field::FieldDefinition;
use crate::model::Model;

/// A semantic defect found in a decoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Rendered identity of the offending entity
    pub entity: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.entity, self.message)
    }
}

impl Entity {
    /// Validate the entity, returning every issue found.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        match self {
            Self::DataSource(ds) => validate_data_source(ds),
            Self::Field(field) => validate_field(field),
            Self::Model(model) => validate_model(model),
        }
    }
}

pub fn validate_data_source(ds: &VirtualDataSource) -> Vec<ValidationIssue> {
    let mut issues = Issues::new(ds.identity().to_string());
    issues.check_name("dataset_slug", &ds.dataset_slug);
    issues.into_vec()
}

pub fn validate_field(field: &FieldDefinition) -> Vec<ValidationIssue> {
    let mut issues = Issues::new(field.identity().to_string());
    issues.check_name("slug", &field.slug);
    if field.data_type.trim().is_empty() {
        issues.push("data_type must not be empty");
    }
    issues.into_vec()
}

pub fn validate_model(model: &Model) -> Vec<ValidationIssue> {
    let mut issues = Issues::new(model.identity().to_string());
    issues.check_name("model_name", &model.model_name);

    if model.data_source.trim().is_empty() {
        issues.push("data_source must not be empty");
    }

    for (idx, field) in model.fields.iter().enumerate() {
        if field.field_map.is_empty() {
            issues.push(format!("fields[{}] has an empty field_map", idx));
        }
        if field.data_reference.trim().is_empty() {
            issues.push(format!("fields[{}] has an empty data_reference", idx));
        }
    }

    for (idx, join) in model.joins.iter().enumerate() {
        if join.to_model.trim().is_empty() {
            issues.push(format!("joins[{}] has no to_model", idx));
        }
        if join.fields.is_empty() {
            issues.push(format!("joins[{}] has no join fields", idx));
        }
    }

    issues.into_vec()
}

struct Issues {
    entity: String,
    found: Vec<ValidationIssue>,
}

impl Issues {
    fn new(entity: String) -> Self {
        Self {
            entity,
            found: Vec::new(),
        }
    }

    fn push(&mut self, message: impl Into<String>) {
        self.found.push(ValidationIssue {
            entity: self.entity.clone(),
            message: message.into(),
        });
    }

    /// Names become file and directory names, so they must be plain.
    fn check_name(&mut self, attribute: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(format!("{} must not be empty", attribute));
        } else if value.contains('/') || value.contains('\\') || value.starts_with('.') {
            self.push(format!("{} '{}' is not a valid file name", attribute, value));
        }
    }

    fn into_vec(self) -> Vec<ValidationIssue> {
        self.found
    }
}
