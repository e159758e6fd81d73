//! One-way analysis of variance across groups

use crate::distribution::fisher_upper_tail;
use crate::GroupSummary;
use rumor_core::math::sum_of_squares;
use rumor_core::{Descriptive, Error, Result};
use rumor_effect::Significance;
use rumor_groups::{Group, Partition};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a one-way ANOVA on one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    pub metric: String,
    pub groups: Vec<GroupSummary>,
    pub f_statistic: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub p_value: f64,
    pub significance: Significance,
}

/// One-way ANOVA over labelled samples
///
/// Empty samples are ignored. At least two remaining samples are required,
/// each with at least two observations.
pub fn anova_samples(metric: &str, samples: &[(String, Vec<f64>)]) -> Result<AnovaResult> {
    let samples: Vec<&(String, Vec<f64>)> =
        samples.iter().filter(|(_, values)| !values.is_empty()).collect();
    if samples.len() < 2 {
        return Err(Error::insufficient(2, samples.len()));
    }
    if let Some((_, values)) = samples.iter().find(|(_, values)| values.len() < 2) {
        return Err(Error::insufficient(2, values.len()));
    }

    let total: usize = samples.iter().map(|(_, v)| v.len()).sum();
    let grand_mean =
        samples.iter().flat_map(|(_, v)| v.iter()).sum::<f64>() / total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    let mut groups = Vec::with_capacity(samples.len());
    for (label, values) in &samples {
        let stats = Descriptive::from_values(values);
        ss_between += values.len() as f64 * (stats.mean - grand_mean).powi(2);
        ss_within += sum_of_squares(values);
        groups.push(GroupSummary::new(label.clone(), stats));
    }

    let df_between = (samples.len() - 1) as f64;
    let df_within = (total - samples.len()) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    let p_value = fisher_upper_tail(f, df_between, df_within)?;

    debug!(metric, groups = samples.len(), f, p = p_value, "one-way ANOVA");

    Ok(AnovaResult {
        metric: metric.to_string(),
        groups,
        f_statistic: f,
        df_between,
        df_within,
        p_value,
        significance: Significance::from_p_value(p_value),
    })
}

/// One-way ANOVA across groups on one metric
pub fn compare_many(groups: &[&Group], metric: &str) -> Result<AnovaResult> {
    let samples = groups
        .iter()
        .map(|g| Ok((g.label(), g.values(metric)?)))
        .collect::<Result<Vec<_>>>()?;
    anova_samples(metric, &samples)
}

/// One-way ANOVA across every group of a partition
pub fn compare_partition(partition: &Partition, metric: &str) -> Result<AnovaResult> {
    let groups: Vec<&Group> = partition.groups().collect();
    compare_many(&groups, metric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample(label: &str, values: &[f64]) -> (String, Vec<f64>) {
        (label.to_string(), values.to_vec())
    }

    #[test]
    fn test_known_f_statistic() {
        let result = anova_samples(
            "m",
            &[
                sample("random", &[1.0, 2.0, 3.0]),
                sample("small-world", &[4.0, 5.0, 6.0]),
                sample("scale-free", &[7.0, 8.0, 9.0]),
            ],
        )
        .unwrap();

        // SSB = 24 on 2 df, SSW = 6 on 6 df.
        assert_abs_diff_eq!(result.f_statistic, 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.df_between, 2.0);
        assert_abs_diff_eq!(result.df_within, 6.0);
        assert_abs_diff_eq!(result.p_value, 0.008, epsilon = 1e-9);
        assert_eq!(result.significance.stars(), "**");
        assert_eq!(result.groups.len(), 3);
        assert_abs_diff_eq!(result.groups[1].stats.mean, 5.0);
    }

    #[test]
    fn test_empty_groups_are_ignored() {
        let result = anova_samples(
            "m",
            &[sample("a", &[1.0, 2.0]), sample("b", &[]), sample("c", &[2.0, 4.0])],
        )
        .unwrap();
        assert_eq!(result.groups.len(), 2);
        assert_abs_diff_eq!(result.df_between, 1.0);
    }

    #[test]
    fn test_insufficient_groups() {
        assert!(matches!(
            anova_samples("m", &[sample("a", &[1.0, 2.0]), sample("b", &[])]),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            anova_samples("m", &[sample("a", &[1.0, 2.0]), sample("b", &[3.0])]),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_identical_groups_have_zero_f() {
        let result =
            anova_samples("m", &[sample("a", &[1.0, 3.0]), sample("b", &[1.0, 3.0])]).unwrap();
        assert_abs_diff_eq!(result.f_statistic, 0.0);
        assert_abs_diff_eq!(result.p_value, 1.0, epsilon = 1e-12);
    }
}
