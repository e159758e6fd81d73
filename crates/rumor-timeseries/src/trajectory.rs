//! Mean trajectories with 95% bands

use rumor_core::math::Z_95;
use rumor_core::{Descriptive, Result, Tick};
use rumor_groups::{Group, Partition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Cross-run summary at one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub tick: Tick,
    pub mean: f64,
    /// Sample standard deviation over runs divided by √n; NaN for one run
    pub std_error: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    /// Runs observed at this tick
    pub n: usize,
}

impl TrajectoryPoint {
    fn from_values(tick: Tick, values: &[f64]) -> Self {
        let stats = Descriptive::from_values(values);
        let std_error = stats.std_error();
        Self {
            tick,
            mean: stats.mean,
            std_error,
            ci_low: stats.mean - Z_95 * std_error,
            ci_high: stats.mean + Z_95 * std_error,
            n: stats.n,
        }
    }
}

/// Mean of one metric over a group's runs, tick by tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub group: String,
    pub metric: String,
    /// Ascending by tick
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn ticks(&self) -> Vec<Tick> {
        self.points.iter().map(|p| p.tick).collect()
    }

    pub fn means(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mean).collect()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Point with the largest mean (first one on ties)
    pub fn peak(&self) -> Option<&TrajectoryPoint> {
        self.points
            .iter()
            .fold(None, |best: Option<&TrajectoryPoint>, p| match best {
                Some(b) if b.mean >= p.mean => Some(b),
                _ => Some(p),
            })
    }
}

/// Aggregate a group's runs into a mean trajectory
pub fn mean_trajectory(group: &Group, metric: &str) -> Result<Trajectory> {
    let table = group.table();
    let idx = table.metric_index(metric)?;

    let mut by_tick: BTreeMap<Tick, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        by_tick.entry(row.tick).or_default().push(row.metrics[idx]);
    }
    let points: Vec<TrajectoryPoint> = by_tick
        .iter()
        .map(|(&tick, values)| TrajectoryPoint::from_values(tick, values))
        .collect();

    debug!(
        group = %group.label(),
        metric,
        ticks = points.len(),
        runs = group.run_count(),
        "mean trajectory"
    );

    Ok(Trajectory {
        group: group.label(),
        metric: metric.to_string(),
        points,
    })
}

/// One trajectory per group of a partition, in key order
pub fn trajectories(partition: &Partition, metric: &str) -> Result<Vec<Trajectory>> {
    partition
        .groups()
        .map(|group| mean_trajectory(group, metric))
        .collect()
}
