//! Reading the local model repository into a [`State`]

use std::collections::BTreeMap;

use async_trait::async_trait;
use pano_fs::{ConfigStore, FileExtension, NormalizedPath};
use pano_model::{Entity, FieldDefinition, IdentityKey, Model, VirtualDataSource};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::layout::{Package, RepoLayout};
use crate::state::{State, StateBuilder};
use crate::sync::StateCollector;
use crate::{Error, Result};

/// Collects the entities stored under a repository root.
///
/// Models and dataset-scoped fields take their dataset from the package's
/// `dataset.yaml`, not from the directory name.
#[derive(Debug, Clone)]
pub struct LocalCollector {
    layout: RepoLayout,
    store: ConfigStore,
}

/// Result of walking the repository.
struct Walk {
    builder: StateBuilder,
    /// File each collected entity was read from
    locations: BTreeMap<IdentityKey, NormalizedPath>,
    errors: Vec<Error>,
}

impl Walk {
    fn new() -> Self {
        Self {
            builder: StateBuilder::new("local files"),
            locations: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    fn add(&mut self, entity: impl Into<Entity>, package: Option<&str>, path: &NormalizedPath) -> Result<()> {
        let entity = entity.into();
        let key = entity.identity();
        self.builder.insert(entity, package.map(str::to_string))?;
        self.locations.insert(key, path.clone());
        Ok(())
    }

    fn failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl LocalCollector {
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

    /// Read the whole repository, stopping at the first error.
    pub fn read_state(&self) -> Result<State> {
        let walk = self.walk(true)?;
        match walk.errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(walk.builder.build()),
        }
    }

    /// Read and check every document, returning all problems found.
    ///
    /// An empty list means the repository can be pushed or pulled.
    pub fn validate(&self) -> Vec<Error> {
        let walk = match self.walk(false) {
            Ok(walk) => walk,
            Err(e) => return vec![e],
        };

        let mut errors = walk.errors;
        let state = walk.builder.build();

        for (key, path) in &walk.locations {
            let Some(entry) = state.get(key) else {
                continue;
            };
            for issue in entry.entity().validate() {
                errors.push(Error::InvalidDocument {
                    path: path.to_native(),
                    message: issue.message,
                });
            }
            if let Some(message) = file_name_mismatch(entry.entity(), path) {
                errors.push(Error::InvalidDocument {
                    path: path.to_native(),
                    message,
                });
            }
        }
        errors
    }

    /// Walk every package and field directory.
    ///
    /// Per-document failures are kept in the walk; with `stop_early` the walk
    /// ends after the first one. The returned error is reserved for failures
    /// to list the repository itself.
    fn walk(&self, stop_early: bool) -> Result<Walk> {
        let mut walk = Walk::new();

        for package in self.layout.packages()? {
            self.read_package(&package, &mut walk, stop_early)?;
            if stop_early && walk.failed() {
                return Ok(walk);
            }
        }

        for path in self.layout.field_files(None)? {
            let result = self.load::<FieldDefinition>(&path).and_then(|field| {
                let field = FieldDefinition {
                    virtual_data_source: None,
                    ..field
                };
                walk.add(field, None, &path)
            });
            if let Err(e) = result {
                walk.errors.push(e);
                if stop_early {
                    break;
                }
            }
        }

        debug!(
            entities = walk.builder.len(),
            errors = walk.errors.len(),
            "collected local state"
        );
        Ok(walk)
    }

    fn read_package(&self, package: &Package, walk: &mut Walk, stop_early: bool) -> Result<()> {
        let dataset_file = self.layout.dataset_file(&package.name);
        let result = self
            .load::<VirtualDataSource>(&dataset_file)
            .and_then(|ds| {
                let slug = ds.dataset_slug.clone();
                walk.add(ds, Some(&package.name), &dataset_file)?;
                Ok(slug)
            });
        let dataset = match result {
            Ok(dataset) => dataset,
            Err(e) => {
                // Without its dataset the package's documents cannot be keyed
                walk.errors.push(e);
                return Ok(());
            }
        };

        for path in self.layout.model_files(package)? {
            let result = self
                .load::<Model>(&path)
                .and_then(|model| walk.add(model.in_dataset(dataset.as_str()), Some(&package.name), &path));
            if let Err(e) = result {
                walk.errors.push(e);
                if stop_early {
                    return Ok(());
                }
            }
        }

        for path in self.layout.field_files(Some(&package.name))? {
            let result = self
                .load::<FieldDefinition>(&path)
                .and_then(|field| walk.add(field.in_dataset(dataset.as_str()), Some(&package.name), &path));
            if let Err(e) = result {
                walk.errors.push(e);
                if stop_early {
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        self.store.load(path).map_err(|e| {
            warn!(path = %path, error = %e, "could not read document");
            Error::from(e)
        })
    }
}

/// Documents are written as `<name><extension>`; a file named otherwise would
/// be duplicated on the next write.
fn file_name_mismatch(entity: &Entity, path: &NormalizedPath) -> Option<String> {
    let (extension, name, attribute) = match entity {
        Entity::DataSource(_) => return None,
        Entity::Model(model) => (FileExtension::Model, model.model_name.as_str(), "model_name"),
        Entity::Field(field) => (FileExtension::Field, field.slug.as_str(), "slug"),
    };
    let stem = path.file_name().and_then(|file| extension.strip(file))?;
    (stem != name).then(|| {
        format!(
            "file name does not match {} '{}' (expected {})",
            attribute,
            name,
            extension.file_name(name)
        )
    })
}

#[async_trait]
impl StateCollector for LocalCollector {
    type Error = Error;

    async fn collect(&self) -> Result<State> {
        self.read_state()
    }
}
