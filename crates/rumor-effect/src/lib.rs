//! Effect size measurement for group comparisons
//!
//! Effect sizes quantify the practical magnitude of a difference beyond its
//! statistical significance. This crate provides the pooled Cohen's d used by
//! the two-sample comparison and the labelling conventions shared by every
//! report: effect bands (small / medium / large) and significance stars.
//!
//! # Example
//!
//! ```rust
//! use rumor_effect::{CohenD, EffectSizeInterpretation};
//!
//! let true_rumors = vec![0.30, 0.35, 0.40, 0.45];
//! let false_rumors = vec![0.50, 0.55, 0.60, 0.65];
//!
//! let effect = CohenD::new().compute(&true_rumors, &false_rumors).unwrap();
//! assert!(effect.magnitude > 0.0);
//! assert_eq!(effect.interpretation, EffectSizeInterpretation::Large);
//! ```

mod cohen_d;
mod types;

// Re-exports
pub use cohen_d::{pooled_std, CohenD};
pub use types::{EffectSize, EffectSizeInterpretation, Significance};

// Convenience constructors
pub fn cohen_d() -> CohenD {
    CohenD::new()
}
