//! Cohen's d with a pooled standard deviation
//!
//! d = (mean_b - mean_a) / s_pooled, where
//! s_pooled² = ((n_a - 1)·s_a² + (n_b - 1)·s_b²) / (n_a + n_b - 2).
//!
//! The sign convention is fixed: a positive d means group b has the larger
//! mean. When group a is the "true rumor" group and group b the "false rumor"
//! group this yields false-minus-true.

use crate::EffectSize;
use rumor_core::{Descriptive, Error, Result};

/// Pooled standard deviation of two samples
///
/// Requires at least two observations per group.
pub fn pooled_std(a: &Descriptive, b: &Descriptive) -> Result<f64> {
    for group in [a, b] {
        if group.n < 2 {
            return Err(Error::insufficient(2, group.n));
        }
    }
    let dof = (a.n + b.n - 2) as f64;
    let pooled_variance =
        ((a.n - 1) as f64 * a.variance() + (b.n - 1) as f64 * b.variance()) / dof;
    Ok(pooled_variance.sqrt())
}

/// Cohen's d effect size estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct CohenD;

impl CohenD {
    pub fn new() -> Self {
        Self
    }

    /// Compute d from group summaries
    ///
    /// A pooled standard deviation of exactly zero gives a NaN magnitude
    /// rather than an error.
    pub fn from_descriptives(&self, a: &Descriptive, b: &Descriptive) -> Result<EffectSize> {
        let pooled = pooled_std(a, b)?;
        let d = if pooled == 0.0 {
            f64::NAN
        } else {
            (b.mean - a.mean) / pooled
        };
        Ok(EffectSize::new(d, (a.n, b.n)))
    }

    /// Compute d from raw samples
    pub fn compute(&self, group_a: &[f64], group_b: &[f64]) -> Result<EffectSize> {
        self.from_descriptives(
            &Descriptive::from_values(group_a),
            &Descriptive::from_values(group_b),
        )
    }
}
