//! Applying actions to the local model repository

use async_trait::async_trait;
use pano_fs::{ConfigStore, NormalizedPath, io};
use pano_model::{Actionable, Entity, FieldDefinition, Model, VirtualDataSource};
use serde::Serialize;
use tracing::debug;

use super::layout::RepoLayout;
use crate::reconcile::{Action, ActionKind};
use crate::sync::Executor;
use crate::{Error, Result};

/// Writes and deletes YAML documents under a repository root.
///
/// Documents are written without the attributes their location implies
/// (a model inside a package does not repeat its dataset).
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    layout: RepoLayout,
    store: ConfigStore,
}

impl LocalExecutor {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self::with_layout(RepoLayout::new(root))
    }

    pub fn with_layout(layout: RepoLayout) -> Self {
        Self {
            layout,
            store: ConfigStore::new(),
        }
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    /// Apply one action synchronously.
    pub fn apply(&self, action: &Action) -> Result<()> {
        let result = match (action.kind(), action.entity()) {
            (ActionKind::Create | ActionKind::Update, Entity::DataSource(ds)) => {
                self.write_data_source(ds, action.package())
            }
            (ActionKind::Create | ActionKind::Update, Entity::Model(model)) => {
                self.write_model(model, action.package())
            }
            (ActionKind::Create | ActionKind::Update, Entity::Field(field)) => {
                self.write_field(field, action.package())
            }
            (ActionKind::Delete, Entity::DataSource(ds)) => {
                self.delete_data_source(ds, action.package())
            }
            (ActionKind::Delete, Entity::Model(model)) => self.delete_model(model, action.package()),
            (ActionKind::Delete, Entity::Field(field)) => self.delete_field(field, action.package()),
        };

        result.map_err(|e| match e {
            Error::ActionRejected { reason, .. } => Error::ActionRejected {
                action: action.description().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn write_data_source(&self, ds: &VirtualDataSource, package: Option<&str>) -> Result<()> {
        let package = checked_segment(package.unwrap_or(&ds.dataset_slug))?;
        if let Some(owner) = self
            .dataset_owner(package)
            .filter(|owner| *owner != ds.dataset_slug)
        {
            return Err(Error::ActionRejected {
                action: String::new(),
                reason: format!("directory '{}' already holds dataset '{}'", package, owner),
            });
        }
        debug!(dataset = %ds.dataset_slug, package, "writing data source");
        self.save(&self.layout.dataset_file(package), &ds.without_location())
    }

    pub fn write_model(&self, model: &Model, package: Option<&str>) -> Result<()> {
        let package = checked_segment(package.unwrap_or(model.dataset()))?;
        let name = checked_segment(&model.model_name)?;
        debug!(model = %model.identity(), package, "writing model");
        self.save(&self.layout.model_file(package, name), &model.without_location())
    }

    pub fn write_field(&self, field: &FieldDefinition, package: Option<&str>) -> Result<()> {
        let path = self.field_path(field, package)?;
        debug!(field = %field.identity(), path = %path, "writing field");
        self.save(&path, &field.without_location())
    }

    /// Write a model produced by a scan into `scanned/`, dataset included.
    pub fn write_scanned_model(&self, model: &Model) -> Result<NormalizedPath> {
        let path = self
            .layout
            .scanned_model_file(checked_segment(&model.model_name)?);
        self.save(&path, model)?;
        Ok(path)
    }

    pub fn delete_data_source(&self, ds: &VirtualDataSource, package: Option<&str>) -> Result<()> {
        let package = checked_segment(package.unwrap_or(&ds.dataset_slug))?;
        if let Some(owner) = self
            .dataset_owner(package)
            .filter(|owner| *owner != ds.dataset_slug)
        {
            debug!(dataset = %ds.dataset_slug, package, owner = %owner, "dataset file belongs to another dataset, keeping it");
            return Ok(());
        }
        io::remove_file(&self.layout.dataset_file(package))?;
        io::remove_dir_if_empty(&self.layout.fields_dir(Some(package)))?;
        io::remove_dir_if_empty(&self.layout.package_dir(package))?;
        Ok(())
    }

    pub fn delete_model(&self, model: &Model, package: Option<&str>) -> Result<()> {
        let package = checked_segment(package.unwrap_or(model.dataset()))?;
        let name = checked_segment(&model.model_name)?;
        io::remove_file(&self.layout.model_file(package, name))?;
        Ok(())
    }

    pub fn delete_field(&self, field: &FieldDefinition, package: Option<&str>) -> Result<()> {
        let path = self.field_path(field, package)?;
        io::remove_file(&path)?;
        if let Some(dir) = path.parent() {
            io::remove_dir_if_empty(&dir)?;
        }
        Ok(())
    }

    fn field_path(&self, field: &FieldDefinition, package: Option<&str>) -> Result<NormalizedPath> {
        let slug = checked_segment(&field.slug)?;
        let package = match field.virtual_data_source.as_deref() {
            None => None,
            Some(dataset) => Some(checked_segment(package.unwrap_or(dataset))?),
        };
        Ok(self.layout.field_file(package, slug))
    }

    /// Slug of the dataset whose `dataset.yaml` sits in `package`, if readable.
    fn dataset_owner(&self, package: &str) -> Option<String> {
        let path = self.layout.dataset_file(package);
        if !path.is_file() {
            return None;
        }
        self.store
            .load::<VirtualDataSource>(&path)
            .ok()
            .map(|ds| ds.dataset_slug)
    }

    fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        self.store.save(path, value)?;
        Ok(())
    }
}

/// Accept a name only when it is a single, ordinary path segment.
fn checked_segment(name: &str) -> Result<&str> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(Error::ActionRejected {
            action: String::new(),
            reason: format!("'{}' is not a valid file or directory name", name),
        });
    }
    Ok(name)
}

#[async_trait]
impl Executor for LocalExecutor {
    type Error = Error;

    async fn execute(&self, action: &Action) -> Result<()> {
        self.apply(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_must_stay_inside_the_repository() {
        assert!(checked_segment("sales").is_ok());
        assert!(checked_segment("../etc").is_err());
        assert!(checked_segment("..").is_err());
        assert!(checked_segment("a\\b").is_err());
        assert!(checked_segment("").is_err());
    }

    #[test]
    fn rejected_action_names_the_action() {
        let dir = tempfile::TempDir::new().unwrap();
        let executor = LocalExecutor::new(dir.path());
        let action = Action::create(Model::new("m1", "db.t"), None);

        let err = executor.apply(&action).unwrap_err();
        assert!(err.to_string().starts_with("Cannot apply 'Create model m1'"), "got: {}", err);
    }
}
