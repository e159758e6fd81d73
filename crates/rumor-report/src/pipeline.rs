//! Generic experiment pipeline
//!
//! One code path serves every experiment: read and normalize the file, then
//! run the analyses its plan lists. Failures are contained at two levels.
//! An error in one (analysis, metric) pair is recorded and the remaining
//! pairs still run; an error reading an experiment marks that experiment
//! failed and the pipeline moves on. A missing file is recorded as such.

use crate::render::{Figure, Renderer};
use crate::summary::{summarize, write_summary_file};
use crate::text;
use crate::{AnalysisConfig, AnalysisKind, AnalysisSpec, ExperimentPlan, ExperimentSpec};
use rumor_core::{ConditionValue, Error, Table};
use rumor_data::{NormalizedTable, Normalizer};
use rumor_groups::{partition, Group};
use rumor_hypothesis::{compare_partition, compare_two, regress_on};
use rumor_timeseries::{final_snapshot, growth_rates, mean_trajectory, series_facts};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Result of one (analysis, metric, group) unit of work
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    /// A precondition did not hold (condition absent or constant, no ticks)
    Skipped { reason: String },
    Failed { error: String },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub analysis: String,
    pub metric: Option<String>,
    /// Label of the split group, when the analysis was repeated per group
    pub group: Option<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExperimentStatus {
    Succeeded,
    /// Input file does not exist
    Missing,
    Failed { error: String },
}

/// Everything produced for one experiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub name: String,
    pub file: PathBuf,
    pub status: ExperimentStatus,
    pub rows: usize,
    pub runs: usize,
    /// Data rows dropped by the normalizer
    pub rejected_rows: usize,
    pub analyses: Vec<AnalysisRecord>,
    /// Text summaries, in the order the analyses ran
    pub lines: Vec<String>,
    pub summary_file: Option<PathBuf>,
}

impl ExperimentReport {
    fn new(spec: &ExperimentSpec, file: PathBuf, status: ExperimentStatus) -> Self {
        Self {
            name: spec.name.clone(),
            file,
            status,
            rows: 0,
            runs: 0,
            rejected_rows: 0,
            analyses: Vec::new(),
            lines: Vec::new(),
            summary_file: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == ExperimentStatus::Succeeded
    }

    pub fn failed_analyses(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.analyses.iter().filter(|a| a.outcome.is_failed())
    }
}

/// Tally of a whole pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub trace_id: Uuid,
    pub experiments: Vec<ExperimentReport>,
}

impl PipelineSummary {
    pub fn succeeded(&self) -> Vec<&str> {
        self.names(|r| r.succeeded())
    }

    /// Missing and failed experiments
    pub fn failed(&self) -> Vec<&str> {
        self.names(|r| !r.succeeded())
    }

    pub fn failed_analyses(&self) -> usize {
        self.experiments.iter().map(|r| r.failed_analyses().count()).sum()
    }

    pub fn report(&self, name: &str) -> Option<&ExperimentReport> {
        self.experiments.iter().find(|r| r.name == name)
    }

    fn names(&self, keep: impl Fn(&ExperimentReport) -> bool) -> Vec<&str> {
        self.experiments
            .iter()
            .filter(|r| keep(r))
            .map(|r| r.name.as_str())
            .collect()
    }
}

/// Runs an [`ExperimentPlan`] and hands figures to a renderer
pub struct Pipeline<'r> {
    config: AnalysisConfig,
    renderer: &'r dyn Renderer,
}

impl<'r> Pipeline<'r> {
    pub fn new(config: AnalysisConfig, renderer: &'r dyn Renderer) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse every experiment of the plan; never fails as a whole
    pub fn run(&self, plan: &ExperimentPlan) -> PipelineSummary {
        let trace_id = Uuid::new_v4();
        let experiments = self.run_all(trace_id, plan);
        let summary = PipelineSummary {
            trace_id,
            experiments,
        };
        info!(
            %trace_id,
            succeeded = summary.succeeded().len(),
            failed = summary.failed().len(),
            failed_analyses = summary.failed_analyses(),
            "pipeline complete"
        );
        summary
    }

    #[cfg(not(feature = "parallel"))]
    #[instrument(skip_all, fields(trace_id = %trace_id, experiments = plan.len()))]
    fn run_all(&self, trace_id: Uuid, plan: &ExperimentPlan) -> Vec<ExperimentReport> {
        plan.experiments.iter().map(|spec| self.run_experiment(spec)).collect()
    }

    #[cfg(feature = "parallel")]
    #[instrument(skip_all, fields(trace_id = %trace_id, experiments = plan.len()))]
    fn run_all(&self, trace_id: Uuid, plan: &ExperimentPlan) -> Vec<ExperimentReport> {
        use rayon::prelude::*;
        plan.experiments.par_iter().map(|spec| self.run_experiment(spec)).collect()
    }

    /// Read, normalize and analyse one experiment
    #[instrument(skip_all, fields(experiment = %spec.name))]
    pub fn run_experiment(&self, spec: &ExperimentSpec) -> ExperimentReport {
        let path = self.config.data_dir.join(&spec.file);
        let normalizer = Normalizer::new(self.config.input.clone(), spec.schema());

        let data = match normalizer.read_path(&path) {
            Ok(data) => data,
            Err(e) if e.is_missing_file() => {
                info!(path = %path.display(), "skipping experiment, file not found");
                return ExperimentReport::new(spec, path, ExperimentStatus::Missing);
            }
            Err(e) => {
                warn!(error = %e, "experiment failed");
                return ExperimentReport::new(
                    spec,
                    path,
                    ExperimentStatus::Failed {
                        error: e.to_string(),
                    },
                );
            }
        };

        let mut report = self.analyze(spec, &data);
        report.file = path;
        if let Err(e) = self.renderer.finish_experiment(&spec.name) {
            warn!(error = %e, "renderer failed to finish experiment");
        }
        report
    }

    /// Run the plan's analyses on an already normalized table
    pub fn analyze(&self, spec: &ExperimentSpec, data: &NormalizedTable) -> ExperimentReport {
        let mut report = ExperimentReport::new(spec, spec.file.clone(), ExperimentStatus::Succeeded);
        report.rows = data.table.len();
        report.runs = data.table.run_count();
        report.rejected_rows = data.rejected_rows().len();
        if report.rejected_rows > 0 {
            warn!(rejected = report.rejected_rows, "rows dropped during normalization");
        }
        info!(rows = report.rows, runs = report.runs, "loaded experiment");

        let mut session = Session {
            pipeline: self,
            spec,
            data,
            report,
        };
        for analysis in &spec.analyses {
            session.run(analysis);
        }
        session.report
    }
}

/// Per-experiment state while its analyses run
struct Session<'p, 'r> {
    pipeline: &'p Pipeline<'r>,
    spec: &'p ExperimentSpec,
    data: &'p NormalizedTable,
    report: ExperimentReport,
}

impl Session<'_, '_> {
    fn run(&mut self, analysis: &AnalysisSpec) {
        let name = analysis.kind.to_string();
        debug!(analysis = %name, "running analysis");
        match &analysis.kind {
            AnalysisKind::TwoGroup {
                condition,
                baseline,
            } => self.two_group(&name, analysis, condition, baseline.as_deref()),
            AnalysisKind::Regression {
                condition,
                split_by,
            } => self.regression(&name, analysis, condition, split_by.as_deref()),
            AnalysisKind::Anova {
                condition,
                split_by,
            } => self.anova(&name, analysis, condition, split_by.as_deref()),
            AnalysisKind::TimeSeries { split_by } => {
                self.time_series(&name, analysis, split_by.as_deref())
            }
            AnalysisKind::Summary => self.summary(&name),
        }
    }

    fn two_group(
        &mut self,
        name: &str,
        analysis: &AnalysisSpec,
        condition: &str,
        baseline: Option<&str>,
    ) {
        let table = final_snapshot(&self.data.table);
        if let Err(reason) = varies(&table, condition, |n| n == 2, "exactly two values") {
            return self.skip(name, reason);
        }
        let mut groups = match partition(&table, condition) {
            Ok(p) => p.into_groups(),
            Err(e) => return self.fail(name, None, None, e),
        };
        if let Some(baseline) = baseline {
            match self.baseline_position(&groups, condition, baseline) {
                Some(0) => {}
                Some(_) => groups.swap(0, 1),
                None => {
                    let error = Error::InvalidParameter(format!(
                        "baseline '{baseline}' matches no value of '{condition}'"
                    ));
                    return self.fail(name, None, None, error);
                }
            }
        }
        let (a, b) = (&groups[0], &groups[1]);

        for metric in self.metrics(name, analysis) {
            let label = self.label(&metric);
            match compare_two(a, b, &metric) {
                Ok(result) => {
                    self.report.lines.push(text::render_comparison(&result, &label));
                    self.emit(Figure::Comparison {
                        experiment: self.spec.name.clone(),
                        metric_label: label,
                        result,
                    });
                    self.complete(name, Some(&metric), None);
                }
                Err(e) => self.fail(name, Some(&metric), None, e),
            }
        }
    }

    fn regression(
        &mut self,
        name: &str,
        analysis: &AnalysisSpec,
        condition: &str,
        split_by: Option<&str>,
    ) {
        let table = final_snapshot(&self.data.table);
        if let Err(reason) = varies(&table, condition, |n| n > 1, "more than one value") {
            return self.skip(name, reason);
        }
        let Some(groups) = self.split(name, &table, split_by) else {
            return;
        };

        for metric in self.metrics(name, analysis) {
            let label = self.label(&metric);
            for group in &groups {
                let group_label = group.label();
                match regress_on(group.table(), condition, &metric) {
                    Ok(result) => {
                        self.report.lines.push(text::render_regression(
                            &result,
                            &group_label,
                            condition,
                            &label,
                        ));
                        self.emit(Figure::Regression {
                            experiment: self.spec.name.clone(),
                            group: group_label.clone(),
                            condition: condition.to_string(),
                            metric_label: label.clone(),
                            result,
                        });
                        self.complete(name, Some(&metric), Some(group_label));
                    }
                    Err(e) => self.fail(name, Some(&metric), Some(group_label), e),
                }
            }
        }
    }

    fn anova(
        &mut self,
        name: &str,
        analysis: &AnalysisSpec,
        condition: &str,
        split_by: Option<&str>,
    ) {
        let table = final_snapshot(&self.data.table);
        if let Err(reason) = varies(&table, condition, |n| n > 1, "more than one value") {
            return self.skip(name, reason);
        }
        let Some(groups) = self.split(name, &table, split_by) else {
            return;
        };

        for metric in self.metrics(name, analysis) {
            let label = self.label(&metric);
            for group in &groups {
                let group_label = group.label();
                let result = partition(group.table(), condition)
                    .and_then(|levels| compare_partition(&levels, &metric));
                match result {
                    Ok(result) => {
                        self.report
                            .lines
                            .push(text::render_anova(&result, &group_label, &label));
                        self.emit(Figure::Anova {
                            experiment: self.spec.name.clone(),
                            group: group_label.clone(),
                            condition: condition.to_string(),
                            metric_label: label.clone(),
                            result,
                        });
                        self.complete(name, Some(&metric), Some(group_label));
                    }
                    Err(e) => self.fail(name, Some(&metric), Some(group_label), e),
                }
            }
        }
    }

    fn time_series(&mut self, name: &str, analysis: &AnalysisSpec, split_by: Option<&str>) {
        let data = self.data;
        let table = &data.table;
        if !table.has_ticks() {
            return self.skip(name, "no tick column".to_string());
        }
        self.report
            .lines
            .push(text::render_series_facts(&series_facts(table)));
        let Some(groups) = self.split(name, table, split_by) else {
            return;
        };
        let min_points = self.pipeline.config.min_growth_points;

        for metric in self.metrics(name, analysis) {
            let label = self.label(&metric);
            let mut trajectories = Vec::with_capacity(groups.len());
            for group in &groups {
                let group_label = group.label();
                match mean_trajectory(group, &metric) {
                    Ok(trajectory) => {
                        self.report
                            .lines
                            .push(text::render_trajectory(&trajectory, &label));
                        trajectories.push(trajectory);
                        self.complete(name, Some(&metric), Some(group_label.clone()));
                    }
                    Err(e) => self.fail(name, Some(&metric), Some(group_label.clone()), e),
                }

                let growth_name = format!("{name}: growth_rate");
                match growth_rates(group.table(), &metric, min_points) {
                    Ok(summary) => {
                        self.report
                            .lines
                            .push(text::render_growth(&summary, &group_label));
                        self.emit(Figure::Growth {
                            experiment: self.spec.name.clone(),
                            group: group_label.clone(),
                            summary,
                        });
                        self.complete(&growth_name, Some(&metric), Some(group_label));
                    }
                    Err(e) => self.fail(&growth_name, Some(&metric), Some(group_label), e),
                }
            }
            if !trajectories.is_empty() {
                self.emit(Figure::Trajectories {
                    experiment: self.spec.name.clone(),
                    metric_label: label,
                    trajectories,
                });
            }
        }
    }

    fn summary(&mut self, name: &str) {
        let summary = match summarize(&self.data.table) {
            Ok(summary) => summary,
            Err(e) => return self.fail(name, None, None, e),
        };
        let stem = self.spec.stem();
        self.report.lines.push(text::render_summary(&summary, &stem));

        let written = if self.pipeline.config.write_summaries {
            let path = self
                .pipeline
                .config
                .output_dir
                .join(format!("{stem}_summary_stats.csv"));
            write_summary_file(&summary, &path).map(|()| Some(path))
        } else {
            Ok(None)
        };
        self.emit(Figure::Summary {
            experiment: self.spec.name.clone(),
            summary,
        });

        match written {
            Ok(path) => {
                if let Some(path) = &path {
                    info!(path = %path.display(), "saved summary table");
                }
                self.report.summary_file = path;
                self.complete(name, None, None);
            }
            Err(e) => self.fail(name, None, None, e),
        }
    }

    /// Index of the group whose value is `baseline`, read through the
    /// condition's declared kind so `"True"` finds the canonical `"true"`
    fn baseline_position(&self, groups: &[Group], condition: &str, baseline: &str) -> Option<usize> {
        let wanted = self
            .data
            .conditions
            .iter()
            .find(|c| c.name == condition)
            .and_then(|c| c.parse(baseline.trim()).ok())
            .unwrap_or_else(|| ConditionValue::categorical(baseline));
        groups
            .iter()
            .position(|g| g.key().values().first() == Some(&wanted))
    }

    /// Groups to repeat an analysis over: one per value of `split_by`, or the
    /// whole table when no split is requested or the column is absent
    fn split(&mut self, name: &str, table: &Table, split_by: Option<&str>) -> Option<Vec<Group>> {
        match split_by {
            Some(column) if table.has_condition(column) => match partition(table, column) {
                Ok(p) => Some(p.into_groups()),
                Err(e) => {
                    self.fail(name, None, None, e);
                    None
                }
            },
            Some(column) => {
                debug!(column, "split condition absent, analysing all runs together");
                Some(vec![Group::whole(table.clone())])
            }
            None => Some(vec![Group::whole(table.clone())]),
        }
    }

    /// Metrics an analysis covers that are present in the table
    ///
    /// An explicit list wins; otherwise the experiment's declared metrics, or
    /// every metric column when none are declared. Requested metrics missing
    /// from the table are recorded as skipped.
    fn metrics(&mut self, name: &str, analysis: &AnalysisSpec) -> Vec<String> {
        let requested: Vec<String> = if !analysis.metrics.is_empty() {
            analysis.metrics.clone()
        } else if !self.spec.metrics.is_empty() {
            self.spec.metrics.iter().map(|m| m.column.clone()).collect()
        } else {
            self.data.table.metrics().to_vec()
        };

        let mut present = Vec::with_capacity(requested.len());
        for metric in requested {
            if self.data.table.has_metric(&metric) {
                present.push(metric);
            } else {
                self.record(
                    name,
                    Some(&metric),
                    None,
                    Outcome::Skipped {
                        reason: "metric column not present".to_string(),
                    },
                );
            }
        }
        present
    }

    fn label(&self, metric: &str) -> String {
        self.data
            .metric_spec(metric)
            .map(|m| m.label().to_string())
            .unwrap_or_else(|| metric.to_string())
    }

    fn emit(&self, figure: Figure) {
        if !self.pipeline.renderer.is_enabled() {
            return;
        }
        if let Err(e) = self.pipeline.renderer.render(&figure) {
            warn!(figure = figure.kind(), error = %e, "renderer rejected figure");
        }
    }

    fn record(&mut self, name: &str, metric: Option<&str>, group: Option<String>, outcome: Outcome) {
        self.report.analyses.push(AnalysisRecord {
            analysis: name.to_string(),
            metric: metric.map(str::to_string),
            group,
            outcome,
        });
    }

    fn complete(&mut self, name: &str, metric: Option<&str>, group: Option<String>) {
        self.record(name, metric, group, Outcome::Completed);
    }

    fn skip(&mut self, name: &str, reason: String) {
        debug!(analysis = name, %reason, "analysis skipped");
        self.record(name, None, None, Outcome::Skipped { reason });
    }

    fn fail(&mut self, name: &str, metric: Option<&str>, group: Option<String>, error: Error) {
        warn!(analysis = name, metric, group = group.as_deref(), error = %error, "analysis failed");
        self.record(
            name,
            metric,
            group,
            Outcome::Failed {
                error: error.to_string(),
            },
        );
    }
}

/// Check that `condition` exists and its number of distinct values passes
/// `accept`; the error is the reason to skip
fn varies(
    table: &Table,
    condition: &str,
    accept: impl Fn(usize) -> bool,
    expectation: &str,
) -> std::result::Result<(), String> {
    if !table.has_condition(condition) {
        return Err(format!("condition '{condition}' not present"));
    }
    let distinct = table.distinct_values(condition).map(|v| v.len()).unwrap_or(0);
    if accept(distinct) {
        Ok(())
    } else {
        Err(format!(
            "condition '{condition}' needs {expectation}, found {distinct}"
        ))
    }
}

/// Run a plan without a renderer
pub fn run_plan(config: AnalysisConfig, plan: &ExperimentPlan) -> PipelineSummary {
    Pipeline::new(config, &crate::NullRenderer).run(plan)
}
