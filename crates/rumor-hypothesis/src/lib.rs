//! Hypothesis tests over grouped simulation runs
//!
//! - [`compare_two`]: independent two-sample Student's t-test with Cohen's d
//! - [`compare_many`]: one-way ANOVA across two or more groups
//! - [`regress`] / [`regress_on`]: least-squares fit and Pearson correlation
//!
//! All results are plain serializable values; nothing is cached between
//! calls.
//!
//! # Example
//!
//! ```rust
//! use rumor_hypothesis::regress;
//!
//! let heterogeneity = [0.0, 0.25, 0.5, 0.75];
//! let belief = [0.20, 0.31, 0.39, 0.52];
//!
//! let fit = regress(&heterogeneity, &belief).unwrap();
//! assert!(fit.slope > 0.0);
//! assert!(fit.r_squared > 0.9);
//! ```

mod anova;
pub mod distribution;
mod regression;
mod two_sample;

pub use anova::{anova_samples, compare_many, compare_partition, AnovaResult};
pub use regression::{regress, regress_on, RegressionResult};
pub use two_sample::{compare_samples, compare_two, t_test, ComparisonResult, GroupSummary, TTest};
