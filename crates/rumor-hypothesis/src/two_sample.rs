//! Independent two-sample Student's t-test with pooled variance

use crate::distribution::students_t_two_tailed;
use rumor_core::{Descriptive, Error, Result};
use rumor_effect::{pooled_std, CohenD, EffectSize, Significance};
use rumor_groups::{describe, Group};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label and summary statistics of one side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub stats: Descriptive,
}

impl GroupSummary {
    pub fn new(label: impl Into<String>, stats: Descriptive) -> Self {
        Self {
            label: label.into(),
            stats,
        }
    }

    pub fn of(group: &Group, metric: &str) -> Result<Self> {
        Ok(Self::new(group.label(), describe(group, metric)?))
    }
}

/// Outcome of comparing two groups on one metric
///
/// Differences are always `b - a`: a positive t statistic or Cohen's d means
/// group b has the larger mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub metric: String,
    pub group_a: GroupSummary,
    pub group_b: GroupSummary,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub significance: Significance,
    pub effect: EffectSize,
}

impl ComparisonResult {
    /// Mean of group b minus mean of group a
    pub fn mean_difference(&self) -> f64 {
        self.group_b.stats.mean - self.group_a.stats.mean
    }

    pub fn cohens_d(&self) -> f64 {
        self.effect.magnitude
    }
}

/// Statistic, degrees of freedom and p-value of a pooled t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTest {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

/// Pooled-variance t-test from group summaries
///
/// A zero standard error follows IEEE division: equal means give a NaN
/// statistic and p-value, different means give an infinite statistic and a
/// p-value of 0.
pub fn t_test(a: &Descriptive, b: &Descriptive) -> Result<TTest> {
    let pooled = pooled_std(a, b)?;
    let df = (a.n + b.n - 2) as f64;
    let std_error = pooled * (1.0 / a.n as f64 + 1.0 / b.n as f64).sqrt();
    let t = (b.mean - a.mean) / std_error;
    Ok(TTest {
        t_statistic: t,
        degrees_of_freedom: df,
        p_value: students_t_two_tailed(t, df)?,
    })
}

/// Compare two labelled samples
pub fn compare_samples(
    metric: &str,
    a: GroupSummary,
    b: GroupSummary,
) -> Result<ComparisonResult> {
    for side in [&a, &b] {
        if side.stats.n < 2 {
            return Err(Error::insufficient(2, side.stats.n));
        }
    }
    let test = t_test(&a.stats, &b.stats)?;
    let effect = CohenD::new().from_descriptives(&a.stats, &b.stats)?;

    debug!(
        metric,
        a = %a.label,
        b = %b.label,
        t = test.t_statistic,
        p = test.p_value,
        d = effect.magnitude,
        "two-sample comparison"
    );

    Ok(ComparisonResult {
        metric: metric.to_string(),
        group_a: a,
        group_b: b,
        t_statistic: test.t_statistic,
        degrees_of_freedom: test.degrees_of_freedom,
        p_value: test.p_value,
        significance: Significance::from_p_value(test.p_value),
        effect,
    })
}

/// Compare two groups on one metric
///
/// Fails with `InsufficientData` when either group has fewer than two
/// observations of the metric.
pub fn compare_two(a: &Group, b: &Group, metric: &str) -> Result<ComparisonResult> {
    compare_samples(
        metric,
        GroupSummary::of(a, metric)?,
        GroupSummary::of(b, metric)?,
    )
}
