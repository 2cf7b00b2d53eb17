//! Property tests for the reconciler

use std::collections::{BTreeMap, BTreeSet};

use pano_core::{ActionKind, State, StateBuilder, reconcile};
use pano_model::{Entity, Field, FieldDefinition, FieldType, IdentityKey, Model, VirtualDataSource};
use proptest::prelude::*;

/// One entity slot: which dataset, which kind, which name, and a variant
/// number that changes the entity's content.
#[derive(Debug, Clone)]
enum Slot {
    DataSource { dataset: u8, variant: u8 },
    Field { dataset: Option<u8>, name: u8, variant: u8 },
    Model { dataset: u8, name: u8, variant: u8 },
}

impl Slot {
    fn entity(&self) -> Entity {
        match *self {
            Slot::DataSource { dataset, variant } => {
                VirtualDataSource::new(format!("ds{dataset}"), format!("Dataset {variant}")).into()
            }
            Slot::Field { dataset, name, variant } => {
                let field = FieldDefinition::new(format!("f{name}"), FieldType::Dimension, format!("type{variant}"));
                match dataset {
                    Some(dataset) => field.in_dataset(format!("ds{dataset}")).into(),
                    None => field.into(),
                }
            }
            Slot::Model { dataset, name, variant } => Model::new(format!("m{name}"), "db.schema.table")
                .in_dataset(format!("ds{dataset}"))
                .with_field(Field::new(["id"], "\"ID\"").with_data_type(format!("type{variant}")))
                .into(),
        }
    }
}

fn arb_slot() -> impl Strategy<Value = Slot> {
    prop_oneof![
        (0u8..3, 0u8..2).prop_map(|(dataset, variant)| Slot::DataSource { dataset, variant }),
        (prop::option::of(0u8..3), 0u8..3, 0u8..2)
            .prop_map(|(dataset, name, variant)| Slot::Field { dataset, name, variant }),
        (0u8..3, 0u8..3, 0u8..2).prop_map(|(dataset, name, variant)| Slot::Model { dataset, name, variant }),
    ]
}

/// A state from arbitrary slots; later slots with an already used key are dropped.
fn arb_state() -> impl Strategy<Value = State> {
    prop::collection::vec(arb_slot(), 0..16).prop_map(|slots| {
        let mut builder = StateBuilder::new("generated");
        let mut seen = BTreeSet::new();
        for slot in slots {
            let entity = slot.entity();
            if seen.insert(entity.identity()) {
                builder.insert(entity, None).unwrap();
            }
        }
        builder.build()
    })
}

fn entities(state: &State) -> BTreeMap<IdentityKey, Entity> {
    state
        .iter()
        .map(|(key, entry)| (key.clone(), entry.entity().clone()))
        .collect()
}

proptest! {
    #[test]
    fn reconciling_a_state_with_itself_is_empty(state in arb_state()) {
        prop_assert!(reconcile(&state, &state).is_empty());
    }

    #[test]
    fn one_action_per_differing_key(source in arb_state(), target in arb_state()) {
        let actions = reconcile(&source, &target);

        let mut expected = BTreeMap::new();
        for (key, entry) in source.iter() {
            match target.get(key) {
                None => { expected.insert(key.clone(), ActionKind::Create); }
                Some(existing) if existing.entity() != entry.entity() => {
                    expected.insert(key.clone(), ActionKind::Update);
                }
                Some(_) => {}
            }
        }
        for key in target.keys() {
            if !source.contains(key) {
                expected.insert(key.clone(), ActionKind::Delete);
            }
        }

        let actual: BTreeMap<IdentityKey, ActionKind> =
            actions.iter().map(|a| (a.identity(), a.kind())).collect();
        prop_assert_eq!(actual.len(), actions.len(), "a key appeared twice");
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn owners_are_written_first_and_deleted_last(source in arb_state(), target in arb_state()) {
        let actions = reconcile(&source, &target);
        let kinds: Vec<(bool, _)> = actions
            .iter()
            .map(|a| (a.kind().is_upsert(), a.identity().kind()))
            .collect();

        let first_delete = kinds.iter().position(|(upsert, _)| !upsert).unwrap_or(kinds.len());
        prop_assert!(kinds[first_delete..].iter().all(|(upsert, _)| !upsert));

        let upserts: Vec<_> = kinds[..first_delete].iter().map(|(_, k)| *k).collect();
        let deletes: Vec<_> = kinds[first_delete..].iter().map(|(_, k)| *k).collect();
        prop_assert!(upserts.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(deletes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn applying_actions_converges_target_to_source(source in arb_state(), target in arb_state()) {
        let mut applied = entities(&target);
        for action in &reconcile(&source, &target) {
            match action.kind() {
                ActionKind::Create | ActionKind::Update => {
                    applied.insert(action.identity(), action.entity().clone());
                }
                ActionKind::Delete => {
                    applied.remove(&action.identity());
                }
            }
        }
        prop_assert_eq!(applied, entities(&source));
    }

    #[test]
    fn reconcile_is_deterministic(source in arb_state(), target in arb_state()) {
        prop_assert_eq!(reconcile(&source, &target), reconcile(&source, &target));
    }
}
