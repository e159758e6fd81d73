//! Renderer interface for figure-worthy results
//!
//! The pipeline never draws anything. Every result that deserves a figure is
//! handed to a [`Renderer`] as a plain [`Figure`] value, so plotting lives
//! entirely outside the analysis crates.

use crate::TableSummary;
use rumor_core::{Error, Result};
use rumor_hypothesis::{AnovaResult, ComparisonResult, RegressionResult};
use rumor_timeseries::{GrowthSummary, Trajectory};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// A result ready to be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "figure", rename_all = "snake_case")]
pub enum Figure {
    /// Two-group bar chart with error bars
    Comparison {
        experiment: String,
        metric_label: String,
        result: ComparisonResult,
    },
    /// Scatter plot with fitted line
    Regression {
        experiment: String,
        group: String,
        condition: String,
        metric_label: String,
        result: RegressionResult,
    },
    /// Per-group box plot
    Anova {
        experiment: String,
        group: String,
        condition: String,
        metric_label: String,
        result: AnovaResult,
    },
    /// Mean trajectories with 95% bands, one per group
    Trajectories {
        experiment: String,
        metric_label: String,
        trajectories: Vec<Trajectory>,
    },
    /// Distribution of per-run peak growth rates
    Growth {
        experiment: String,
        group: String,
        summary: GrowthSummary,
    },
    /// Descriptive table
    Summary {
        experiment: String,
        summary: TableSummary,
    },
}

impl Figure {
    pub fn experiment(&self) -> &str {
        match self {
            Self::Comparison { experiment, .. }
            | Self::Regression { experiment, .. }
            | Self::Anova { experiment, .. }
            | Self::Trajectories { experiment, .. }
            | Self::Growth { experiment, .. }
            | Self::Summary { experiment, .. } => experiment,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Comparison { .. } => "comparison",
            Self::Regression { .. } => "regression",
            Self::Anova { .. } => "anova",
            Self::Trajectories { .. } => "trajectories",
            Self::Growth { .. } => "growth",
            Self::Summary { .. } => "summary",
        }
    }
}

/// Consumer of figures produced by the pipeline
///
/// Implementations must be shareable across threads; experiments may be
/// analysed concurrently.
pub trait Renderer: Send + Sync {
    /// Receive one figure
    fn render(&self, figure: &Figure) -> Result<()>;

    /// Called once after all figures of an experiment were delivered
    fn finish_experiment(&self, _experiment: &str) -> Result<()> {
        Ok(())
    }

    /// Whether this renderer produces anything; disabled renderers are
    /// never handed figures
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Renderer that discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _figure: &Figure) -> Result<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Renderer that keeps every figure in memory
///
/// Useful for tests and for exporting all results as JSON for an external
/// plotting tool.
#[derive(Debug, Default)]
pub struct CollectingRenderer {
    figures: Mutex<Vec<Figure>>,
}

impl CollectingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the figures received so far, in delivery order
    pub fn figures(&self) -> Vec<Figure> {
        self.figures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.figures.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Figures of one experiment
    pub fn for_experiment(&self, experiment: &str) -> Vec<Figure> {
        self.figures()
            .into_iter()
            .filter(|f| f.experiment() == experiment)
            .collect()
    }

    /// All figures as a JSON array; undefined statistics become `null`
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.figures())
            .map_err(|e| Error::Computation(format!("cannot serialize figures: {e}")))
    }
}

impl Renderer for CollectingRenderer {
    fn render(&self, figure: &Figure) -> Result<()> {
        self.figures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(figure.clone());
        Ok(())
    }
}
