use proptest::{prop_assert, prop_assert_eq, proptest};
use rstest::rstest;

use super::{
    model::LabelModel,
    strategies::{key_pair, operation_sequences},
    support::{apply, assert_agrees, engine_groups, run_in_lockstep},
    types::{KEY_SPACE, Operation},
};
use crate::{
    DisjointMap, DisjointSet,
    test_utils::{suite_proptest_config, verifying, verifying_map, verifying_set},
};

fn key_value(key: u8) -> u32 {
    u32::from(key) * 10
}

#[rstest]
#[case::merge_then_split(&[
    Operation::Add { key: 1 },
    Operation::Add { key: 2 },
    Operation::Merge { x: 1, y: 2 },
    Operation::Join { key: 2 },
    Operation::Merge { x: 2, y: 1 },
])]
#[case::teardown_of_nested_group(&[
    Operation::Add { key: 1 },
    Operation::AddTo { key: 2, target: 1 },
    Operation::Add { key: 3 },
    Operation::Merge { x: 3, y: 1 },
    Operation::DelExcept { key: 2 },
    Operation::DelAll { key: 3 },
])]
#[case::moves_out_of_absorbed_headers(&[
    Operation::Add { key: 1 },
    Operation::Add { key: 2 },
    Operation::Add { key: 3 },
    Operation::Merge { x: 1, y: 2 },
    Operation::Merge { x: 3, y: 1 },
    Operation::JoinTo { key: 2, target: 3 },
    Operation::Find { key: 1 },
    Operation::Del { key: 3 },
])]
fn known_sequences_match_the_model(#[case] operations: &[Operation]) {
    let mut set = DisjointSet::<u8>::with_config(verifying());
    let mut model = LabelModel::default();
    run_in_lockstep(&mut set, &mut model, operations, |_| ())
        .unwrap_or_else(|err| panic!("{err}"));
}

proptest! {
    #![proptest_config(suite_proptest_config(256))]

    #[test]
    fn set_tracks_the_label_model(operations in operation_sequences()) {
        let mut set = DisjointSet::<u8>::with_config(verifying());
        let mut model = LabelModel::default();
        run_in_lockstep(&mut set, &mut model, &operations, |_| ())?;
    }

    #[test]
    fn map_values_survive_regrouping(operations in operation_sequences()) {
        let mut map = DisjointMap::<u8, u32>::with_config(verifying());
        let mut model = LabelModel::default();
        run_in_lockstep(&mut map, &mut model, &operations, key_value)?;
        for (&key, &value) in map.iter() {
            prop_assert_eq!(value, key_value(key));
        }
    }

    #[test]
    fn rebuilt_and_cloned_partitions_compare_equal(operations in operation_sequences()) {
        let mut set = DisjointSet::<u8>::with_config(verifying());
        let mut model = LabelModel::default();
        run_in_lockstep(&mut set, &mut model, &operations, |_| ())?;

        let rebuilt = verifying_set(model.groups());
        prop_assert_eq!(&rebuilt, &set);

        let copy = set.clone();
        prop_assert_eq!(&copy, &set);
        prop_assert_eq!(copy.forest().live_headers(), copy.classification());
        assert_agrees(&copy, &model)?;
    }

    #[test]
    fn map_equality_weighs_values(operations in operation_sequences()) {
        let mut map = DisjointMap::<u8, u32>::with_config(verifying());
        let mut model = LabelModel::default();
        run_in_lockstep(&mut map, &mut model, &operations, key_value)?;

        let groups = model.groups();
        let rebuilt = verifying_map(groups.iter().map(|group| {
            group.iter().map(|&key| (key, key_value(key))).collect::<Vec<_>>()
        }));
        prop_assert_eq!(&rebuilt, &map);

        if let Some(&key) = groups.first().and_then(|group| group.first()) {
            let mut altered = map.clone();
            prop_assert!(altered.update(&key, key_value(key) + 1));
            prop_assert!(altered != map);
        }
    }

    #[test]
    fn repeated_unions_are_idempotent(
        operations in operation_sequences(),
        (x, y) in key_pair(),
    ) {
        let mut set = DisjointSet::<u8>::with_config(verifying());
        let mut model = LabelModel::default();
        run_in_lockstep(&mut set, &mut model, &operations, |_| ())?;

        for operation in [Operation::Merge { x, y }, Operation::JoinTo { key: x, target: y }] {
            let once = apply(&mut set, operation, |_| ());
            let snapshot = engine_groups(&set);
            let twice = apply(&mut set, operation, |_| ());
            prop_assert_eq!(once, twice);
            prop_assert_eq!(engine_groups(&set), snapshot);
        }
    }

    #[test]
    fn compression_never_changes_the_partition(operations in operation_sequences()) {
        let mut set = DisjointSet::<u8>::with_config(verifying());
        let mut model = LabelModel::default();
        run_in_lockstep(&mut set, &mut model, &operations, |_| ())?;

        let before = set.clone();
        let roots: Vec<_> = (0..KEY_SPACE).map(|key| set.root(&key)).collect();
        for key in 0..KEY_SPACE {
            let found = set.find(&key);
            prop_assert_eq!(found, roots[usize::from(key)]);
            if let Some(node) = set.node(&key) {
                prop_assert_eq!(set.forest().depth_of(node), Some(1));
            }
        }
        prop_assert_eq!(&set, &before);
        assert_agrees(&set, &model)?;
    }
}
