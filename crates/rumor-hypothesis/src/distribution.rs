//! Tail probabilities of the reference distributions
//!
//! Infinite statistics map to a p-value of 0 and NaN statistics propagate,
//! so degenerate samples never abort a report.

use rumor_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Two-tailed p-value of a Student's t statistic
pub fn students_t_two_tailed(t: f64, df: f64) -> Result<f64> {
    if t.is_nan() {
        return Ok(f64::NAN);
    }
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| Error::Computation(format!("Failed to create t-distribution: {}", e)))?;
    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Upper-tail p-value of an F statistic
pub fn fisher_upper_tail(f: f64, df_between: f64, df_within: f64) -> Result<f64> {
    if f.is_nan() {
        return Ok(f64::NAN);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| Error::Computation(format!("Failed to create F-distribution: {}", e)))?;
    Ok(dist.sf(f).clamp(0.0, 1.0))
}
