//! Ordinary least squares and Pearson correlation of a metric on a
//! continuous condition

use crate::distribution::students_t_two_tailed;
use rumor_core::math::mean;
use rumor_core::{ConditionValue, Error, Result, Table};
use rumor_effect::Significance;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Straight-line fit of y on x together with the correlation test
///
/// Degenerate samples follow least-squares conventions. Constant x fits a
/// flat line through the mean of y (slope 0, R² 0, or 1 when y is constant
/// too). Constant y is fitted exactly (R² 1). In both cases the correlation
/// and its p-value are undefined (NaN).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Pearson correlation coefficient
    pub r: f64,
    /// Two-tailed p-value of the correlation
    pub p_value: f64,
    pub n: usize,
}

impl RegressionResult {
    pub fn significance(&self) -> Significance {
        Significance::from_p_value(self.p_value)
    }

    /// Fitted value at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `ys = intercept + slope * xs` by least squares
///
/// Samples of unequal length or shorter than two fail with
/// `InsufficientData`.
pub fn regress(xs: &[f64], ys: &[f64]) -> Result<RegressionResult> {
    if xs.len() != ys.len() {
        return Err(Error::insufficient(xs.len().max(ys.len()), xs.len().min(ys.len())));
    }
    if xs.len() < 2 {
        return Err(Error::insufficient(2, xs.len()));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(Error::non_finite("regression samples"));
    }

    let n = xs.len();
    let (mx, my) = (mean(xs), mean(ys));
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        debug!(n, "constant x, fitting the mean of y");
        return Ok(RegressionResult {
            slope: 0.0,
            intercept: my,
            r_squared: if syy == 0.0 { 1.0 } else { 0.0 },
            r: f64::NAN,
            p_value: f64::NAN,
            n,
        });
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let (r, r_squared, p_value) = if syy == 0.0 {
        (f64::NAN, 1.0, f64::NAN)
    } else {
        let ss_residual: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
        (r, 1.0 - ss_residual / syy, correlation_p_value(r, n)?)
    };

    debug!(n, slope, intercept, r, p = p_value, "linear regression");

    Ok(RegressionResult {
        slope,
        intercept,
        r_squared,
        r,
        p_value,
        n,
    })
}

/// Two-tailed p-value of a Pearson correlation on `n - 2` degrees of freedom
fn correlation_p_value(r: f64, n: usize) -> Result<f64> {
    if n <= 2 {
        return Ok(1.0);
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return Ok(0.0);
    }
    students_t_two_tailed(r * (df / denom).sqrt(), df)
}

/// Regress a metric on a continuous condition column
///
/// Every observation contributes one point. Categorical and boolean
/// conditions are rejected with a schema error.
pub fn regress_on(table: &Table, condition: &str, metric: &str) -> Result<RegressionResult> {
    let xs = table
        .condition_values(condition)?
        .iter()
        .map(|value| match value {
            ConditionValue::Numeric(x) => Ok(x.0),
            ConditionValue::Categorical(s) => Err(Error::Schema(format!(
                "condition '{condition}' is not continuous (value {s:?})"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    let ys = table.metric_values(metric)?;
    regress(&xs, &ys)
}
