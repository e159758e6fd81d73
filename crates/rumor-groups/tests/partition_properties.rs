use proptest::prelude::*;
use rumor_core::{ConditionValue, Row, RunId, Table};
use rumor_groups::{partition, partition_by};
use std::collections::BTreeSet;

const NETWORKS: [&str; 3] = ["random", "small-world", "scale-free"];

/// Random multi-tick table: each run gets a network, a truth flag and a
/// handful of ticks
fn arb_table() -> impl Strategy<Value = Table> {
    prop::collection::vec((0usize..3, any::<bool>(), 1usize..4, 0.0f64..1.0), 0..25).prop_map(
        |runs| {
            let mut rows = Vec::new();
            for (i, (network, truth, ticks, value)) in runs.into_iter().enumerate() {
                let conditions = vec![
                    ConditionValue::categorical(NETWORKS[network]),
                    ConditionValue::boolean(truth),
                ];
                for tick in 0..ticks {
                    rows.push(Row::new(
                        i as RunId + 1,
                        tick as u64,
                        conditions.clone(),
                        vec![value * tick as f64],
                    ));
                }
            }
            Table::new(
                vec!["network-type".into(), "rumor-is-true?".into()],
                vec!["awareness".into()],
                true,
                rows,
            )
            .unwrap()
        },
    )
}

proptest! {
    #[test]
    fn groups_are_disjoint_and_exhaustive(table in arb_table()) {
        let partition = partition(&table, "network-type").unwrap();

        let mut seen: BTreeSet<RunId> = BTreeSet::new();
        let mut rows = 0;
        for group in partition.groups() {
            let ids = group.run_ids();
            prop_assert!(seen.is_disjoint(&ids));
            seen.extend(ids);
            rows += group.len();
        }
        prop_assert_eq!(seen, table.run_ids());
        prop_assert_eq!(rows, table.len());
    }

    #[test]
    fn group_rows_share_their_key(table in arb_table()) {
        let partition = partition_by(&table, &["network-type", "rumor-is-true?"]).unwrap();
        for (key, group) in partition.iter() {
            for row in group.table().rows() {
                prop_assert_eq!(&row.conditions, key.values());
            }
        }
        prop_assert!(partition.len() <= 6);
    }

    #[test]
    fn keys_are_ascending(table in arb_table()) {
        let partition = partition(&table, "rumor-is-true?").unwrap();
        let keys: Vec<_> = partition.keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}

#[test]
fn empty_table_has_no_groups() {
    let table = Table::new(vec!["network-type".into()], vec!["m".into()], false, vec![]).unwrap();
    let partition = partition(&table, "network-type").unwrap();
    assert!(partition.is_empty());
}
