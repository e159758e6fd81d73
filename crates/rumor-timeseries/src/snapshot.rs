//! Final-tick snapshots and time-series facts

use rumor_core::{RunId, Table, Tick};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keep, for each run, only the observation at that run's largest tick
///
/// A table without a tick dimension is already a single snapshot and is
/// returned as is.
pub fn final_snapshot(table: &Table) -> Table {
    if !table.has_ticks() {
        return table.clone();
    }
    let mut last: HashMap<RunId, Tick> = HashMap::new();
    for row in table.rows() {
        let tick = last.entry(row.run).or_insert(row.tick);
        *tick = (*tick).max(row.tick);
    }
    table.filter(|row| last.get(&row.run) == Some(&row.tick))
}

/// Run count and tick span of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesFacts {
    pub runs: usize,
    pub observations: usize,
    pub min_tick: Option<Tick>,
    pub max_tick: Option<Tick>,
}

pub fn series_facts(table: &Table) -> SeriesFacts {
    let range = table.tick_range();
    SeriesFacts {
        runs: table.run_count(),
        observations: table.len(),
        min_tick: range.map(|(lo, _)| lo),
        max_tick: range.map(|(_, hi)| hi),
    }
}
