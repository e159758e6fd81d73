//! Experiment pipeline and reporting for rumor simulations
//!
//! This crate ties the analysis crates together:
//!
//! - [`ExperimentPlan`] lists experiment files with their conditions,
//!   metrics and analyses (JSON, or [`ExperimentPlan::rumor_default`])
//! - [`Pipeline`] runs one generic code path over every experiment, isolating
//!   failures per analysis and per experiment
//! - [`summarize`] / [`write_summary_csv`] produce the descriptive table
//! - [`Renderer`] receives every figure-worthy result as a plain [`Figure`];
//!   drawing is left to the caller
//! - [`text`] renders results as console-friendly summaries
//!
//! # Example
//!
//! ```rust
//! use rumor_report::{AnalysisConfig, ExperimentPlan, NullRenderer, Pipeline};
//!
//! let config = AnalysisConfig::default()
//!     .with_data_dir("/nonexistent")
//!     .with_write_summaries(false);
//! let pipeline = Pipeline::new(config, &NullRenderer);
//!
//! // Missing files are skipped, never fatal.
//! let summary = pipeline.run(&ExperimentPlan::rumor_default());
//! assert_eq!(summary.failed().len(), 8);
//! assert!(summary.succeeded().is_empty());
//! ```

pub mod config;
pub mod pipeline;
pub mod plan;
pub mod render;
pub mod summary;
pub mod text;

pub use config::AnalysisConfig;
pub use pipeline::{
    run_plan, AnalysisRecord, ExperimentReport, ExperimentStatus, Outcome, Pipeline,
    PipelineSummary,
};
pub use plan::{AnalysisKind, AnalysisSpec, ExperimentPlan, ExperimentSpec};
pub use render::{CollectingRenderer, Figure, NullRenderer, Renderer};
pub use summary::{summarize, write_summary_csv, write_summary_file, MetricSummary, TableSummary};
