//! Actions produced by the reconciler

use pano_model::{Entity, IdentityKey};

/// What an [`Action`] does to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

impl ActionKind {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    /// Create and update both write the full entity.
    pub fn is_upsert(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// A single change to apply to a target, immutable once built.
///
/// For creates and updates the entity is the full source entity; for deletes
/// it is the target entity being removed. The package is a location hint for
/// executors that store entities in directories.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    kind: ActionKind,
    entity: Entity,
    package: Option<String>,
    description: String,
}

impl Action {
    pub fn create(entity: impl Into<Entity>, package: Option<String>) -> Self {
        Self::new(ActionKind::Create, entity.into(), package)
    }

    pub fn update(entity: impl Into<Entity>, package: Option<String>) -> Self {
        Self::new(ActionKind::Update, entity.into(), package)
    }

    pub fn delete(entity: impl Into<Entity>, package: Option<String>) -> Self {
        Self::new(ActionKind::Delete, entity.into(), package)
    }

    fn new(kind: ActionKind, entity: Entity, package: Option<String>) -> Self {
        let description = format!("{} {} {}", kind.verb(), entity.kind().label(), entity.identity());
        Self {
            kind,
            entity,
            package,
            description,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn identity(&self) -> IdentityKey {
        self.entity.identity()
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Human readable summary, e.g. `Update model ds1.m1`.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// Ordered list of actions, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSet {
    actions: Vec<Action>,
}

impl ActionSet {
    pub(crate) fn from_ordered(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Number of actions of the given kind.
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind == kind).count()
    }

    pub fn descriptions(&self) -> Vec<&str> {
        self.actions.iter().map(Action::description).collect()
    }
}

impl IntoIterator for ActionSet {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActionSet {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pano_model::{FieldDefinition, FieldType, Model, VirtualDataSource};

    #[test]
    fn descriptions_name_kind_and_key() {
        assert_eq!(
            Action::create(VirtualDataSource::new("ds1", "DS 1"), None).description(),
            "Create data source ds1"
        );
        assert_eq!(
            Action::update(Model::new("m1", "db.t").in_dataset("ds1"), None).description(),
            "Update model ds1.m1"
        );
        assert_eq!(
            Action::delete(
                FieldDefinition::new("revenue", FieldType::Metric, "money").in_dataset("ds1"),
                Some("ds1".into())
            )
            .to_string(),
            "Delete field ds1.revenue"
        );
    }

    #[test]
    fn upsert_kinds() {
        assert!(ActionKind::Create.is_upsert());
        assert!(ActionKind::Update.is_upsert());
        assert!(!ActionKind::Delete.is_upsert());
    }
}
