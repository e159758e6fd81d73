//! Metric column descriptions

use serde::{Deserialize, Serialize};

fn default_scale() -> f64 {
    1.0
}

/// A named dependent variable
///
/// The column name is an opaque key; reporter expressions such as
/// `count turtles with [rumor-known?] / population-size` are never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Column name in the normalized table
    pub column: String,
    /// Human-facing label
    #[serde(default)]
    pub label: Option<String>,
    /// Display scale factor (e.g. 100 for percentages)
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl MetricSpec {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            label: None,
            scale: default_scale(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Label to show in reports, falling back to the column name
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.column)
    }

    /// Apply the display scale to a raw value
    pub fn display(&self, value: f64) -> f64 {
        value * self.scale
    }
}
