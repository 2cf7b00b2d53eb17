//! Reconciliation of two states into an ordered set of actions
//!
//! [`reconcile`] is pure and deterministic: the same pair of states always
//! yields the same [`ActionSet`], and it never fails.
//!
//! Execution order:
//!
//! 1. Creates and updates, owners first (data sources, then fields, then
//!    models), each group in key order.
//! 2. Deletes, dependents first (models, then fields, then data sources),
//!    each group in key order.
//!
//! References between models (joins) are not checked here.
//!
//! A created dataset gets its slug as package directory unless the target
//! already uses that directory for another dataset; it then gets the first
//! free `<slug>_<n>`.

mod action;

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

pub use action::{Action, ActionKind, ActionSet};

use pano_model::{EntityKind, IdentityKey};

use crate::state::State;

/// Compute the actions that converge `target` towards `source`.
///
/// - key only in `source`: create with the source entity
/// - key only in `target`: delete with the target entity and its package
/// - key in both and entities differ: update with the source entity and the
///   target's package
pub fn reconcile(source: &State, target: &State) -> ActionSet {
    let mut upserts = Vec::new();
    let mut deletes = Vec::new();
    let placements = place_new_datasets(source, target);

    for (key, entry) in source.iter() {
        match target.get(key) {
            None => upserts.push(Action::create(
                entry.entity().clone(),
                create_package(key, target, &placements),
            )),
            Some(existing) if existing.entity() != entry.entity() => upserts.push(Action::update(
                entry.entity().clone(),
                existing.package().map(str::to_string),
            )),
            Some(_) => {}
        }
    }

    for (key, entry) in target.iter() {
        if !source.contains(key) {
            deletes.push(Action::delete(
                entry.entity().clone(),
                entry.package().map(str::to_string),
            ));
        }
    }

    // Both states iterate in key order, so upserts are already sorted by
    // (kind, key); deletes need the kind rank reversed.
    deletes.sort_by_key(|action| (Reverse(action.identity().kind()), action.identity()));

    upserts.extend(deletes);
    ActionSet::from_ordered(upserts)
}

/// Directory hint for a created entity: next to its dataset when the target
/// already holds that dataset, or in the directory picked for a new dataset.
fn create_package(
    key: &IdentityKey,
    target: &State,
    placements: &BTreeMap<String, String>,
) -> Option<String> {
    match key.kind() {
        EntityKind::DataSource => placements.get(key.package()).cloned(),
        EntityKind::Field | EntityKind::Model if key.package().is_empty() => None,
        EntityKind::Field | EntityKind::Model => target
            .dataset_package(key.package())
            .map(str::to_string)
            .or_else(|| placements.get(key.package()).cloned()),
    }
}

/// Directories for datasets missing from `target` whose slug directory is
/// already taken. Datasets that can use their slug are not listed.
fn place_new_datasets(source: &State, target: &State) -> BTreeMap<String, String> {
    let new_datasets: Vec<&str> = source
        .keys()
        .filter(|key| key.kind() == EntityKind::DataSource && !target.contains(key))
        .map(IdentityKey::package)
        .collect();

    let mut taken: BTreeSet<String> = target.packages().map(str::to_string).collect();
    let mut displaced = Vec::new();
    for slug in new_datasets {
        if !taken.insert(slug.to_string()) {
            displaced.push(slug);
        }
    }

    let mut placements = BTreeMap::new();
    for slug in displaced {
        let dir = (2..)
            .map(|n| format!("{}_{}", slug, n))
            .find(|dir| !taken.contains(dir))
            .unwrap_or_else(|| slug.to_string());
        taken.insert(dir.clone());
        placements.insert(slug.to_string(), dir);
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use pano_model::{Entity, Field, Model, VirtualDataSource};
    use pretty_assertions::assert_eq;

    use crate::state::StateBuilder;

    fn model(ds: &str, name: &str) -> Model {
        Model::new(name, "db.schema.table")
            .in_dataset(ds)
            .with_field(Field::new(["id"], "\"ID\"").with_data_type("integer"))
    }

    #[test]
    fn empty_states_yield_no_actions() {
        assert!(reconcile(&State::empty(), &State::empty()).is_empty());
    }

    #[test]
    fn creates_dataset_before_model() {
        let source = StateBuilder::new("local")
            .with(model("ds1", "m1"), Some("ds1"))
            .unwrap()
            .with(VirtualDataSource::new("ds1", "DS 1"), Some("ds1"))
            .unwrap()
            .build();

        let actions = reconcile(&source, &State::empty());
        assert_eq!(actions.descriptions(), vec!["Create data source ds1", "Create model ds1.m1"]);
    }

    #[test]
    fn deletes_model_before_dataset() {
        let target = StateBuilder::new("local")
            .with(VirtualDataSource::new("ds1", "DS 1"), Some("ds1"))
            .unwrap()
            .with(model("ds1", "m1"), Some("ds1"))
            .unwrap()
            .build();

        let actions = reconcile(&State::empty(), &target);
        assert_eq!(actions.descriptions(), vec!["Delete model ds1.m1", "Delete data source ds1"]);
        assert!(actions.iter().all(|a| a.package() == Some("ds1")));
    }

    #[test]
    fn changed_data_type_is_a_single_update_with_target_package() {
        let mut changed = model("ds1", "m1");
        changed.fields[0].data_type = Some("text".into());

        let source = StateBuilder::new("remote").with(changed.clone(), None).unwrap().build();
        let target = StateBuilder::new("local")
            .with(model("ds1", "m1"), Some("ds1_dir"))
            .unwrap()
            .build();

        let actions = reconcile(&source, &target);
        assert_eq!(actions.len(), 1);

        let action = &actions.as_slice()[0];
        assert_eq!(action.kind(), ActionKind::Update);
        assert_eq!(action.entity(), &Entity::Model(changed));
        assert_eq!(action.package(), Some("ds1_dir"));
    }

    #[test]
    fn create_lands_next_to_existing_dataset() {
        let source = StateBuilder::new("remote")
            .with(VirtualDataSource::new("ds1", "DS 1"), None)
            .unwrap()
            .with(model("ds1", "m2"), None)
            .unwrap()
            .build();
        let target = StateBuilder::new("local")
            .with(VirtualDataSource::new("ds1", "DS 1"), Some("custom_dir"))
            .unwrap()
            .build();

        let actions = reconcile(&source, &target);
        assert_eq!(actions.descriptions(), vec!["Create model ds1.m2"]);
        assert_eq!(actions.as_slice()[0].package(), Some("custom_dir"));
    }

    #[test]
    fn upserts_precede_deletes() {
        let source = StateBuilder::new("remote")
            .with(VirtualDataSource::new("new", "New"), None)
            .unwrap()
            .build();
        let target = StateBuilder::new("local")
            .with(VirtualDataSource::new("old", "Old"), Some("old"))
            .unwrap()
            .with(model("old", "m1"), Some("old"))
            .unwrap()
            .build();

        let actions = reconcile(&source, &target);
        assert_eq!(
            actions.descriptions(),
            vec!["Create data source new", "Delete model old.m1", "Delete data source old"]
        );
    }

    #[test]
    fn new_dataset_avoids_directory_of_another_dataset() {
        let source = StateBuilder::new("remote")
            .with(VirtualDataSource::new("sales", "Sales"), None)
            .unwrap()
            .with(model("sales", "orders"), None)
            .unwrap()
            .build();
        let target = StateBuilder::new("local")
            .with(VirtualDataSource::new("other", "Other"), Some("sales"))
            .unwrap()
            .with(model("other", "legacy"), Some("sales"))
            .unwrap()
            .build();

        let actions = reconcile(&source, &target);
        assert_eq!(
            actions.descriptions(),
            vec![
                "Create data source sales",
                "Create model sales.orders",
                "Delete model other.legacy",
                "Delete data source other"
            ]
        );
        let packages: Vec<_> = actions.iter().map(Action::package).collect();
        assert_eq!(
            packages,
            vec![Some("sales_2"), Some("sales_2"), Some("sales"), Some("sales")]
        );
    }

    #[test]
    fn displaced_dataset_skips_directories_claimed_by_new_datasets() {
        let source = StateBuilder::new("remote")
            .with(VirtualDataSource::new("sales", "Sales"), None)
            .unwrap()
            .with(VirtualDataSource::new("sales_2", "Sales 2"), None)
            .unwrap()
            .build();
        let target = StateBuilder::new("local")
            .with(VirtualDataSource::new("other", "Other"), Some("sales"))
            .unwrap()
            .build();

        let actions = reconcile(&source, &target);
        let packages: Vec<_> = actions.iter().map(Action::package).collect();
        assert_eq!(packages, vec![Some("sales_3"), None, Some("sales")]);
    }

    #[test]
    fn location_is_not_part_of_equality() {
        let source = StateBuilder::new("remote").with(model("ds1", "m1"), None).unwrap().build();
        let target = StateBuilder::new("local")
            .with(model("ds1", "m1"), Some("elsewhere"))
            .unwrap()
            .build();

        assert!(reconcile(&source, &target).is_empty());
    }
}
