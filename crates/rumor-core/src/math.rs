//! Descriptive statistics shared across the analysis crates
//!
//! All functions follow the "undefined is NaN" convention: a statistic that
//! is not defined for the given sample size evaluates to `f64::NAN` instead of
//! failing, and callers decide whether that is fatal.

use serde::{Deserialize, Serialize};

/// Two-sided 95% normal critical value used for trajectory bands
pub const Z_95: f64 = 1.96;

/// Arithmetic mean; NaN for an empty sample
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared deviations from the mean
pub fn sum_of_squares(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum()
}

/// Unbiased sample variance (n - 1 denominator); NaN when n < 2
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    sum_of_squares(values) / (values.len() - 1) as f64
}

/// Sample standard deviation; NaN when n < 2
pub fn std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Linearly interpolated quantile of an ascending-sorted sample
///
/// Uses the `(n - 1) * p` positioning rule. NaN for an empty sample.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let frac = pos - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

/// Mean, standard deviation and sample size of one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptive {
    pub mean: f64,
    /// Sample standard deviation, NaN when `n < 2`
    pub std_dev: f64,
    pub n: usize,
}

impl Descriptive {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            std_dev: std_dev(values),
            n: values.len(),
        }
    }

    /// Sample variance recovered from the standard deviation
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    /// Standard error of the mean; NaN when `n < 2`
    pub fn std_error(&self) -> f64 {
        self.std_dev / (self.n as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&values), 5.0);
        assert_abs_diff_eq!(sample_variance(&values), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_cases() {
        assert!(mean(&[]).is_nan());
        assert!(sample_variance(&[1.0]).is_nan());
        assert!(std_dev(&[]).is_nan());
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn test_quantiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.75), 3.25);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 1.0), 4.0);
        assert_abs_diff_eq!(quantile_sorted(&[7.0], 0.3), 7.0);
    }

    #[test]
    fn test_descriptive() {
        let d = Descriptive::from_values(&[1.0, 2.0]);
        assert_abs_diff_eq!(d.mean, 1.5);
        assert_abs_diff_eq!(d.std_dev, 0.5f64.sqrt(), epsilon = 1e-12);
        assert_eq!(d.n, 2);
        assert_abs_diff_eq!(d.std_error(), 0.5, epsilon = 1e-12);

        let single = Descriptive::from_values(&[10.0]);
        assert_eq!(single.n, 1);
        assert!(single.std_dev.is_nan());
        assert!(single.std_error().is_nan());
    }
}
