//! Statistical comparison and aggregation of rumor-propagation simulation runs
//!
//! This crate re-exports the workspace crates:
//!
//! - [`rumor_core`]: normalized table model, condition domains, errors
//! - [`rumor_data`]: BehaviorSpace CSV normalization
//! - [`rumor_effect`]: Cohen's d and significance bands
//! - [`rumor_groups`]: partitioning runs by condition values
//! - [`rumor_hypothesis`]: t-test, ANOVA, regression
//! - [`rumor_timeseries`]: final snapshots, mean trajectories, growth rates
//! - [`rumor_report`]: experiment plans, the pipeline and text reports

pub use rumor_core;
pub use rumor_data;
pub use rumor_effect;
pub use rumor_groups;
pub use rumor_hypothesis;
pub use rumor_report;
pub use rumor_timeseries;

/// Commonly used types in one import
pub mod prelude {
    pub use rumor_core::prelude::*;
    pub use rumor_data::{NormalizedTable, Normalizer, NormalizerConfig, TableSchema};
    pub use rumor_effect::{CohenD, EffectSize, Significance};
    pub use rumor_groups::{describe, partition, partition_by, Group, Partition};
    pub use rumor_hypothesis::{
        compare_many, compare_two, regress, regress_on, AnovaResult, ComparisonResult,
        RegressionResult,
    };
    pub use rumor_report::{
        AnalysisConfig, AnalysisSpec, ExperimentPlan, ExperimentSpec, Pipeline, PipelineSummary,
        Renderer,
    };
    pub use rumor_timeseries::{final_snapshot, growth_rates, mean_trajectory, Trajectory};
}
