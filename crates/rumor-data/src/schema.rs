//! Column roles for one experiment's table

use rumor_core::{ConditionSpec, MetricSpec};
use serde::{Deserialize, Serialize};

fn default_run_column() -> String {
    "[run number]".to_string()
}

fn default_tick_columns() -> Vec<String> {
    vec!["ticks".to_string(), "[step]".to_string()]
}

fn default_header_lines() -> usize {
    6
}

/// Fixed-format details of the input files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Leading non-data lines before the header row
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
    /// Run identifier column
    #[serde(default = "default_run_column")]
    pub run_column: String,
    /// Candidate tick columns; the first one present is used
    #[serde(default = "default_tick_columns")]
    pub tick_columns: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            header_lines: default_header_lines(),
            run_column: default_run_column(),
            tick_columns: default_tick_columns(),
        }
    }
}

impl NormalizerConfig {
    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    pub fn with_run_column(mut self, run_column: impl Into<String>) -> Self {
        self.run_column = run_column.into();
        self
    }

    pub fn with_tick_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tick_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Declared conditions and metrics of an experiment
///
/// Columns that are neither declared nor the run/tick column are either
/// ignored or, with `infer_undeclared`, classified by name (reporter-like
/// names become metrics) and by content (condition kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
    #[serde(default = "default_infer")]
    pub infer_undeclared: bool,
}

fn default_infer() -> bool {
    true
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSchema {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            metrics: Vec::new(),
            infer_undeclared: true,
        }
    }

    pub fn with_condition(mut self, condition: ConditionSpec) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_metric(mut self, metric: MetricSpec) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Only keep declared columns
    pub fn strict(mut self) -> Self {
        self.infer_undeclared = false;
        self
    }

    pub fn condition(&self, name: &str) -> Option<&ConditionSpec> {
        self.conditions.iter().find(|c| c.name == name)
    }

    pub fn metric(&self, column: &str) -> Option<&MetricSpec> {
        self.metrics.iter().find(|m| m.column == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: NormalizerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, NormalizerConfig::default());
        assert_eq!(config.header_lines, 6);
        assert_eq!(config.run_column, "[run number]");
    }

    #[test]
    fn test_schema_lookup() {
        let schema = TableSchema::new()
            .with_condition(ConditionSpec::boolean("rumor-is-true?"))
            .with_metric(MetricSpec::new("mean [belief] of turtles"));
        assert!(schema.condition("rumor-is-true?").is_some());
        assert!(schema.metric("mean [belief] of turtles").is_some());
        assert!(schema.metric("other").is_none());
        assert!(schema.infer_undeclared);
        assert!(!schema.strict().infer_undeclared);
    }
}
