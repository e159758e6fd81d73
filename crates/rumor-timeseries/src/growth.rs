//! Peak finite-difference growth rates

use rumor_core::{Descriptive, Result, Run, RunId, Table, Tick};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Steepest rise of one metric within one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub run: RunId,
    pub metric: String,
    /// Largest Δvalue / Δtick between consecutive observations
    pub peak_rate: f64,
    pub tick_from: Tick,
    pub tick_to: Tick,
}

/// Peak forward-difference derivative of a metric over a run's series
///
/// Runs with fewer than `min_points` observations (and never fewer than two)
/// yield `None`: short runs are filtered out, not treated as failures.
pub fn growth_rate(run: &Run<'_>, metric: &str, min_points: usize) -> Result<Option<GrowthRecord>> {
    let series = run.series(metric)?;
    if series.len() < min_points.max(2) {
        return Ok(None);
    }

    let mut best: Option<(f64, Tick, Tick)> = None;
    for pair in series.windows(2) {
        let ((t0, v0), (t1, v1)) = (pair[0], pair[1]);
        let rate = (v1 - v0) / (t1 - t0) as f64;
        if best.map_or(true, |(peak, _, _)| rate > peak) {
            best = Some((rate, t0, t1));
        }
    }

    Ok(best.map(|(peak_rate, tick_from, tick_to)| GrowthRecord {
        run: run.id(),
        metric: metric.to_string(),
        peak_rate,
        tick_from,
        tick_to,
    }))
}

/// Growth records of every eligible run of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub metric: String,
    pub min_points: usize,
    pub records: Vec<GrowthRecord>,
    /// Runs dropped for having too few observations
    pub excluded: Vec<RunId>,
    /// Distribution of peak rates over the included runs
    pub peak_rates: Descriptive,
}

impl GrowthSummary {
    pub fn included(&self) -> usize {
        self.records.len()
    }
}

/// Growth rate of each run, with short runs set aside
pub fn growth_rates(table: &Table, metric: &str, min_points: usize) -> Result<GrowthSummary> {
    table.metric_index(metric)?;

    let mut records = Vec::new();
    let mut excluded = Vec::new();
    for run in table.runs() {
        match growth_rate(&run, metric, min_points)? {
            Some(record) => records.push(record),
            None => excluded.push(run.id()),
        }
    }
    if !excluded.is_empty() {
        debug!(
            metric,
            min_points,
            excluded = excluded.len(),
            "runs too short for growth-rate estimation"
        );
    }

    let peaks: Vec<f64> = records.iter().map(|r| r.peak_rate).collect();
    Ok(GrowthSummary {
        metric: metric.to_string(),
        min_points,
        peak_rates: Descriptive::from_values(&peaks),
        records,
        excluded,
    })
}
