//! Types for effect size and significance representation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interpretation of a standardized mean difference
///
/// Bands are half-open on the upper side: |d| < 0.5 is small, |d| < 0.8 is
/// medium, anything else is large. A NaN effect (zero pooled spread) is
/// undefined rather than forced into a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSizeInterpretation {
    Small,
    Medium,
    Large,
    Undefined,
}

impl EffectSizeInterpretation {
    /// Small-effect upper bound (exclusive)
    pub const MEDIUM_THRESHOLD: f64 = 0.5;
    /// Medium-effect upper bound (exclusive)
    pub const LARGE_THRESHOLD: f64 = 0.8;

    /// Interpret Cohen's d
    pub fn from_cohen_d(d: f64) -> Self {
        if d.is_nan() {
            return Self::Undefined;
        }
        let abs_d = d.abs();
        if abs_d < Self::MEDIUM_THRESHOLD {
            Self::Small
        } else if abs_d < Self::LARGE_THRESHOLD {
            Self::Medium
        } else {
            Self::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for EffectSizeInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Significance band of a two-tailed p-value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    /// p < 0.001
    VeryHigh,
    /// p < 0.01
    High,
    /// p < 0.05
    Significant,
    /// Everything else, including an undefined p-value
    NotSignificant,
}

impl Significance {
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.001 {
            Self::VeryHigh
        } else if p < 0.01 {
            Self::High
        } else if p < 0.05 {
            Self::Significant
        } else {
            Self::NotSignificant
        }
    }

    /// Star notation used in tables and figure annotations
    pub fn stars(&self) -> &'static str {
        match self {
            Self::VeryHigh => "***",
            Self::High => "**",
            Self::Significant => "*",
            Self::NotSignificant => "ns",
        }
    }

    pub fn is_significant(&self) -> bool {
        !matches!(self, Self::NotSignificant)
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stars())
    }
}

/// A standardized effect with its interpretation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSize {
    pub magnitude: f64,
    pub interpretation: EffectSizeInterpretation,
    /// Sample sizes (group a, group b)
    pub sample_sizes: (usize, usize),
}

impl EffectSize {
    pub fn new(magnitude: f64, sample_sizes: (usize, usize)) -> Self {
        Self {
            magnitude,
            interpretation: EffectSizeInterpretation::from_cohen_d(magnitude),
            sample_sizes,
        }
    }

    /// Positive effects favour the second group
    pub fn favors_group_b(&self) -> bool {
        self.magnitude > 0.0
    }
}

impl fmt::Display for EffectSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} ({} effect)", self.magnitude, self.interpretation)
    }
}
