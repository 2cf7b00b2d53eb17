//! Immutable snapshots of entities keyed by identity
//!
//! A [`State`] is built once through a [`StateBuilder`] and never mutated
//! afterwards. Each entry remembers the package directory it was read from;
//! that location is carried along for executors but never compared.

use std::collections::{BTreeMap, BTreeSet};

use pano_model::{Entity, EntityKind, IdentityKey};
use tracing::debug;

use crate::{Error, Result};

/// One entity in a [`State`] together with its location.
#[derive(Debug, Clone)]
pub struct StateEntry {
    entity: Entity,
    package: Option<String>,
}

impl StateEntry {
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Local directory the entity was read from, if any.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }
}

/// Snapshot of a set of entities, unique by [`IdentityKey`].
#[derive(Debug, Clone, Default)]
pub struct State {
    entries: BTreeMap<IdentityKey, StateEntry>,
}

impl State {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a state from entities without a package location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateIdentity`] when two entities share a key.
    pub fn from_entities<I, E>(origin: &str, entities: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Entity>,
    {
        let mut builder = StateBuilder::new(origin);
        for entity in entities {
            builder.insert(entity, None)?;
        }
        Ok(builder.build())
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&StateEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&IdentityKey, &StateEntry)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &IdentityKey> {
        self.entries.keys()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entries.keys().filter(|key| key.kind() == kind).count()
    }

    /// Package directory holding the dataset with the given slug.
    pub fn dataset_package(&self, dataset_slug: &str) -> Option<&str> {
        self.entries
            .get(&IdentityKey::data_source(dataset_slug))
            .and_then(StateEntry::package)
    }

    /// Package directories in use, each listed once.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.entries
            .values()
            .filter_map(StateEntry::package)
            .collect::<BTreeSet<_>>()
            .into_iter()
    }
}

/// Accumulates entities and rejects duplicate identities.
#[derive(Debug)]
pub struct StateBuilder {
    origin: String,
    entries: BTreeMap<IdentityKey, StateEntry>,
}

impl StateBuilder {
    /// `origin` names where the entities come from and is used in error messages.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, entity: impl Into<Entity>, package: Option<String>) -> Result<()> {
        let entity = entity.into();
        let key = entity.identity();

        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateIdentity {
                kind: key.kind().label(),
                key: key.to_string(),
                origin: self.origin.clone(),
            });
        }

        debug!(origin = %self.origin, key = %key, "collected entity");
        self.entries.insert(key, StateEntry { entity, package });
        Ok(())
    }

    /// Chainable form of [`StateBuilder::insert`].
    pub fn with(mut self, entity: impl Into<Entity>, package: Option<&str>) -> Result<Self> {
        self.insert(entity, package.map(str::to_string))?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> State {
        State {
            entries: self.entries,
        }
    }
}
