use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rumor_core::{ConditionValue, Error, Row, Table};
use rumor_groups::partition;
use rumor_hypothesis::{compare_many, compare_two, compare_partition};

fn truth_table(true_values: &[f64], false_values: &[f64]) -> Table {
    let rows = true_values
        .iter()
        .map(|v| (true, *v))
        .chain(false_values.iter().map(|v| (false, *v)))
        .enumerate()
        .map(|(i, (truth, v))| Row::new(i as u64, 0, vec![ConditionValue::boolean(truth)], vec![v]))
        .collect();
    Table::new(vec!["rumor-is-true?".into()], vec!["awareness".into()], false, rows).unwrap()
}

proptest! {
    #[test]
    fn swapping_groups_negates_t_and_keeps_p(
        a in prop::collection::vec(0.0f64..1.0, 2..20),
        b in prop::collection::vec(0.0f64..1.0, 2..20),
    ) {
        let table = truth_table(&a, &b);
        let groups = partition(&table, "rumor-is-true?").unwrap();
        let truthful = groups.get_value(&ConditionValue::boolean(true)).unwrap();
        let false_rumor = groups.get_value(&ConditionValue::boolean(false)).unwrap();

        let forward = compare_two(truthful, false_rumor, "awareness").unwrap();
        let backward = compare_two(false_rumor, truthful, "awareness").unwrap();

        if forward.t_statistic.is_nan() {
            prop_assert!(backward.t_statistic.is_nan());
            prop_assert!(backward.p_value.is_nan());
        } else {
            prop_assert_eq!(forward.t_statistic, -backward.t_statistic);
            prop_assert_eq!(forward.p_value, backward.p_value);
            prop_assert!((0.0..=1.0).contains(&forward.p_value));
        }
        prop_assert_eq!(forward.significance, backward.significance);
        prop_assert_eq!(forward.effect.interpretation, backward.effect.interpretation);
    }
}

#[test]
fn shifted_groups_are_detected() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let truthful: Vec<f64> = (0..50).map(|_| 0.4 + rng.gen_range(-0.05..0.05)).collect();
    let false_rumor: Vec<f64> = (0..50).map(|_| 0.6 + rng.gen_range(-0.05..0.05)).collect();
    let table = truth_table(&truthful, &false_rumor);
    let groups = partition(&table, "rumor-is-true?").unwrap();

    let result = compare_two(
        groups.get_value(&ConditionValue::boolean(true)).unwrap(),
        groups.get_value(&ConditionValue::boolean(false)).unwrap(),
        "awareness",
    )
    .unwrap();

    // false-minus-true is positive for this data
    assert!(result.t_statistic > 0.0);
    assert!(result.cohens_d() > 0.8);
    assert_eq!(result.significance.stars(), "***");
    assert_abs_diff_eq!(result.mean_difference(), 0.2, epsilon = 0.03);
    assert_eq!(result.group_a.label, "rumor-is-true?=true");
}

#[test]
fn anova_over_network_types() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let networks = ["random", "scale-free", "small-world"];
    let rows = (0..60u64)
        .map(|i| {
            let network = networks[(i % 3) as usize];
            let base = (i % 3) as f64 * 0.1;
            Row::new(
                i,
                0,
                vec![ConditionValue::categorical(network)],
                vec![base + rng.gen_range(0.0..0.02)],
            )
        })
        .collect();
    let table = Table::new(vec!["network-type".into()], vec!["belief".into()], false, rows).unwrap();
    let groups = partition(&table, "network-type").unwrap();

    let result = compare_partition(&groups, "belief").unwrap();
    assert_eq!(result.groups.len(), 3);
    assert_eq!(result.groups[0].label, "network-type=random");
    assert_abs_diff_eq!(result.df_between, 2.0);
    assert_abs_diff_eq!(result.df_within, 57.0);
    assert!(result.p_value < 0.001);

    let single: Vec<_> = groups.groups().take(1).collect();
    assert!(matches!(
        compare_many(&single, "belief"),
        Err(Error::InsufficientData { expected: 2, actual: 1 })
    ));
}
