//! Experiment plans: which files to read and which analyses to run on them

use rumor_core::{ConditionSpec, Error, MetricSpec, Result};
use rumor_data::TableSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const AWARENESS: &str = "count turtles with [rumor-known?] / population-size";
pub const MEAN_BELIEF: &str = "mean [belief] of turtles";
pub const STRONG_BELIEVERS: &str = "count turtles with [belief > 0.5]";
pub const BELIEF_VARIANCE: &str = "variance [belief] of turtles";

pub const RUMOR_IS_TRUE: &str = "rumor-is-true?";
pub const HETEROGENEITY: &str = "heterogeneity-level";
pub const NETWORK_TYPE: &str = "network-type";

/// What to compute for an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisKind {
    /// t-test and Cohen's d between the two values of a condition
    ///
    /// `baseline` names the value treated as group a, so effects read as
    /// other-minus-baseline. Without it the smaller value is group a.
    TwoGroup {
        condition: String,
        #[serde(default)]
        baseline: Option<String>,
    },
    /// Metric regressed on a continuous condition, optionally per value of
    /// another condition
    Regression {
        condition: String,
        #[serde(default)]
        split_by: Option<String>,
    },
    /// One-way ANOVA over a condition's values, optionally per value of
    /// another condition
    Anova {
        condition: String,
        #[serde(default)]
        split_by: Option<String>,
    },
    /// Mean trajectories and growth rates
    TimeSeries {
        #[serde(default)]
        split_by: Option<String>,
    },
    /// Descriptive table of every metric
    Summary,
}

impl AnalysisKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TwoGroup { .. } => "two_group",
            Self::Regression { .. } => "regression",
            Self::Anova { .. } => "anova",
            Self::TimeSeries { .. } => "time_series",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoGroup { condition, .. } => write!(f, "two_group({condition})"),
            Self::Regression { condition, split_by } | Self::Anova { condition, split_by } => {
                match split_by {
                    Some(split) => write!(f, "{}({condition} by {split})", self.name()),
                    None => write!(f, "{}({condition})", self.name()),
                }
            }
            Self::TimeSeries { split_by: Some(split) } => write!(f, "time_series(by {split})"),
            Self::TimeSeries { split_by: None } => write!(f, "time_series"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// One analysis and the metrics it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSpec {
    #[serde(flatten)]
    pub kind: AnalysisKind,
    /// Metric columns to analyse; empty means every declared metric
    #[serde(default)]
    pub metrics: Vec<String>,
}

impl AnalysisSpec {
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            metrics: Vec::new(),
        }
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    pub fn two_group(condition: impl Into<String>) -> Self {
        Self::new(AnalysisKind::TwoGroup {
            condition: condition.into(),
            baseline: None,
        })
    }

    pub fn regression(condition: impl Into<String>) -> Self {
        Self::new(AnalysisKind::Regression {
            condition: condition.into(),
            split_by: None,
        })
    }

    pub fn anova(condition: impl Into<String>) -> Self {
        Self::new(AnalysisKind::Anova {
            condition: condition.into(),
            split_by: None,
        })
    }

    pub fn time_series() -> Self {
        Self::new(AnalysisKind::TimeSeries { split_by: None })
    }

    pub fn summary() -> Self {
        Self::new(AnalysisKind::Summary)
    }

    /// Set the baseline value of a two-group analysis
    pub fn with_baseline(mut self, value: impl Into<String>) -> Self {
        if let AnalysisKind::TwoGroup { baseline, .. } = &mut self.kind {
            *baseline = Some(value.into());
        }
        self
    }

    /// Repeat the analysis for every value of `condition`
    pub fn split_by(mut self, condition: impl Into<String>) -> Self {
        match &mut self.kind {
            AnalysisKind::Regression { split_by, .. }
            | AnalysisKind::Anova { split_by, .. }
            | AnalysisKind::TimeSeries { split_by } => *split_by = Some(condition.into()),
            AnalysisKind::TwoGroup { .. } | AnalysisKind::Summary => {}
        }
        self
    }
}

/// One experiment file and its analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSpec {
    pub name: String,
    /// Relative paths are resolved against the configured data directory
    pub file: PathBuf,
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
    #[serde(default)]
    pub analyses: Vec<AnalysisSpec>,
}

impl ExperimentSpec {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            conditions: Vec::new(),
            metrics: Vec::new(),
            analyses: Vec::new(),
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

    pub fn with_analysis(mut self, analysis: AnalysisSpec) -> Self {
        self.analyses.push(analysis);
        self
    }

    /// Column roles handed to the normalizer
    pub fn schema(&self) -> TableSchema {
        let schema = self
            .conditions
            .iter()
            .cloned()
            .fold(TableSchema::new(), TableSchema::with_condition);
        self.metrics.iter().cloned().fold(schema, TableSchema::with_metric)
    }

    /// Summary file stem, e.g. `exp4_verification` for `results/exp4_verification.csv`
    pub fn stem(&self) -> String {
        self.file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.replace(' ', "_"))
    }
}

/// Ordered list of experiments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperimentPlan {
    pub experiments: Vec<ExperimentSpec>,
}

impl ExperimentPlan {
    pub fn new(experiments: Vec<ExperimentSpec>) -> Self {
        Self { experiments }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid experiment plan: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("cannot serialize experiment plan: {e}")))
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// The eight BehaviorSpace experiments of the rumor model
    pub fn rumor_default() -> Self {
        let experiment = rumor_experiment;
        let awareness_only = [AWARENESS];

        Self::new(vec![
            experiment("Experiment 1: False vs True Rumor", "results/exp1_false_vs_true.csv")
                .with_analysis(AnalysisSpec::two_group(RUMOR_IS_TRUE).with_baseline("true")),
            experiment("Experiment 2: Heterogeneity Effect", "results/exp2_heterogeneity.csv")
                .with_analysis(
                    AnalysisSpec::regression(HETEROGENEITY)
                        .split_by(RUMOR_IS_TRUE)
                        .with_metrics(awareness_only),
                ),
            experiment("Experiment 3: Network Structure", "results/exp3_networks.csv")
                .with_analysis(
                    AnalysisSpec::anova(NETWORK_TYPE)
                        .split_by(RUMOR_IS_TRUE)
                        .with_metrics(awareness_only),
                ),
            experiment("Experiment 4: Verification Timing", "results/exp4_verification.csv")
                .with_analysis(AnalysisSpec::summary()),
            experiment("Experiment 5: Learning Rate", "results/exp5_learning.csv")
                .with_analysis(AnalysisSpec::summary()),
            experiment("Experiment 6: Initial Trust", "results/exp6_trust.csv")
                .with_analysis(AnalysisSpec::summary()),
            experiment("Experiment 7: Time Series", "results/exp7_timeseries.csv").with_analysis(
                AnalysisSpec::time_series()
                    .split_by(RUMOR_IS_TRUE)
                    .with_metrics(awareness_only),
            ),
            experiment("Experiment 8: Full Factorial", "results/exp8_factorial.csv")
                .with_analysis(AnalysisSpec::summary()),
        ])
    }
}

/// Experiment with the rumor model's shared conditions and metrics declared
fn rumor_experiment(name: &str, file: &str) -> ExperimentSpec {
    ExperimentSpec::new(name, file)
        .with_condition(ConditionSpec::boolean(RUMOR_IS_TRUE))
        .with_condition(ConditionSpec::continuous(HETEROGENEITY))
        .with_condition(ConditionSpec::categorical(
            NETWORK_TYPE,
            ["random", "small-world", "scale-free"],
        ))
        .with_metric(
            MetricSpec::new(AWARENESS)
                .with_label("Awareness (%)")
                .with_scale(100.0),
        )
        .with_metric(MetricSpec::new(MEAN_BELIEF).with_label("Mean Belief"))
        .with_metric(MetricSpec::new(STRONG_BELIEVERS).with_label("Strong Believers (%)"))
        .with_metric(MetricSpec::new(BELIEF_VARIANCE).with_label("Belief Variance"))
}
