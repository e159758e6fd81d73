//! Normalized run table
//!
//! A [`Table`] is the immutable, validated form of one experiment's output:
//! every row is one observation of one run at one tick. Operations that
//! select or reduce rows return a new table.

use crate::{ConditionValue, Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Simulation run identifier
pub type RunId = u64;

/// Discrete simulation time step
pub type Tick = u64;

/// One observation: a run's metric values at one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub run: RunId,
    /// Always 0 for tables without a tick dimension
    pub tick: Tick,
    /// Aligned with [`Table::conditions`]
    pub conditions: Vec<ConditionValue>,
    /// Aligned with [`Table::metrics`]
    pub metrics: Vec<f64>,
}

impl Row {
    pub fn new(run: RunId, tick: Tick, conditions: Vec<ConditionValue>, metrics: Vec<f64>) -> Self {
        Self {
            run,
            tick,
            conditions,
            metrics,
        }
    }
}

/// Validated table of observations
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    conditions: Vec<String>,
    metrics: Vec<String>,
    has_ticks: bool,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, checking the data-model invariants
    ///
    /// Fails when a row's shape does not match the columns, a metric value is
    /// not finite, a run changes condition values between rows, or a tick is
    /// repeated within a run (without a tick dimension this means a run may
    /// only appear once).
    pub fn new(
        conditions: Vec<String>,
        metrics: Vec<String>,
        has_ticks: bool,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let mut seen_columns = HashSet::new();
        for name in conditions.iter().chain(metrics.iter()) {
            if !seen_columns.insert(name.as_str()) {
                return Err(Error::Schema(format!("duplicate column '{name}'")));
            }
        }

        let mut runs: HashMap<RunId, (&[ConditionValue], HashSet<Tick>)> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            if row.conditions.len() != conditions.len() {
                return Err(Error::size_mismatch(
                    conditions.len(),
                    row.conditions.len(),
                    &format!("condition values of row {idx}"),
                ));
            }
            if row.metrics.len() != metrics.len() {
                return Err(Error::size_mismatch(
                    metrics.len(),
                    row.metrics.len(),
                    &format!("metric values of row {idx}"),
                ));
            }
            if row.metrics.iter().any(|v| !v.is_finite()) {
                return Err(Error::non_finite(&format!("row {idx}")));
            }
            if !has_ticks && row.tick != 0 {
                return Err(Error::InvalidInput(format!(
                    "row {idx} has tick {} but the table has no tick dimension",
                    row.tick
                )));
            }

            let (assigned, ticks) = runs
                .entry(row.run)
                .or_insert_with(|| (row.conditions.as_slice(), HashSet::new()));
            if *assigned != row.conditions.as_slice() {
                return Err(Error::InvalidInput(format!(
                    "run {} changes condition values at row {idx}",
                    row.run
                )));
            }
            if !ticks.insert(row.tick) {
                return Err(Error::InvalidInput(format!(
                    "run {} repeats tick {} at row {idx}",
                    row.run, row.tick
                )));
            }
        }

        Ok(Self {
            conditions,
            metrics,
            has_ticks,
            rows,
        })
    }

    /// Subset of rows from an already-validated table
    fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            conditions: self.conditions.clone(),
            metrics: self.metrics.clone(),
            has_ticks: self.has_ticks,
            rows,
        }
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn has_ticks(&self) -> bool {
        self.has_ticks
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_condition(&self, name: &str) -> bool {
        self.conditions.iter().any(|c| c == name)
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.iter().any(|m| m == name)
    }

    pub fn condition_index(&self, name: &str) -> Result<usize> {
        self.conditions
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::missing_column(name))
    }

    pub fn metric_index(&self, name: &str) -> Result<usize> {
        self.metrics
            .iter()
            .position(|m| m == name)
            .ok_or_else(|| Error::missing_column(name))
    }

    /// Distinct run identifiers, ascending
    pub fn run_ids(&self) -> BTreeSet<RunId> {
        self.rows.iter().map(|r| r.run).collect()
    }

    pub fn run_count(&self) -> usize {
        self.run_ids().len()
    }

    /// All values of one metric, in row order
    pub fn metric_values(&self, metric: &str) -> Result<Vec<f64>> {
        let idx = self.metric_index(metric)?;
        Ok(self.rows.iter().map(|r| r.metrics[idx]).collect())
    }

    /// Condition value of every row, in row order
    pub fn condition_values(&self, condition: &str) -> Result<Vec<ConditionValue>> {
        let idx = self.condition_index(condition)?;
        Ok(self.rows.iter().map(|r| r.conditions[idx].clone()).collect())
    }

    /// Distinct values a condition takes in this table
    pub fn distinct_values(&self, condition: &str) -> Result<BTreeSet<ConditionValue>> {
        let idx = self.condition_index(condition)?;
        Ok(self.rows.iter().map(|r| r.conditions[idx].clone()).collect())
    }

    /// Smallest and largest tick present
    pub fn tick_range(&self) -> Option<(Tick, Tick)> {
        let min = self.rows.iter().map(|r| r.tick).min()?;
        let max = self.rows.iter().map(|r| r.tick).max()?;
        Some((min, max))
    }

    /// Rows satisfying a predicate, as a new table
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        self.with_rows(self.rows.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Rows whose condition equals `value`
    pub fn where_condition(&self, condition: &str, value: &ConditionValue) -> Result<Self> {
        let idx = self.condition_index(condition)?;
        Ok(self.filter(|r| &r.conditions[idx] == value))
    }

    /// Per-run views, ascending by run id
    pub fn runs(&self) -> Vec<Run<'_>> {
        let mut grouped: BTreeMap<RunId, Vec<&Row>> = BTreeMap::new();
        for row in &self.rows {
            grouped.entry(row.run).or_default().push(row);
        }
        grouped
            .into_iter()
            .map(|(id, mut rows)| {
                rows.sort_by_key(|r| r.tick);
                Run {
                    id,
                    table: self,
                    rows,
                }
            })
            .collect()
    }

    /// View of one run, if present
    pub fn run(&self, id: RunId) -> Option<Run<'_>> {
        let mut rows: Vec<&Row> = self.rows.iter().filter(|r| r.run == id).collect();
        if rows.is_empty() {
            return None;
        }
        rows.sort_by_key(|r| r.tick);
        Some(Run {
            id,
            table: self,
            rows,
        })
    }
}

/// Borrowed view of one run's observations, ascending by tick
#[derive(Debug, Clone)]
pub struct Run<'a> {
    id: RunId,
    table: &'a Table,
    rows: Vec<&'a Row>,
}

impl<'a> Run<'a> {
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[&'a Row] {
        &self.rows
    }

    /// The run's value for a condition
    pub fn condition(&self, name: &str) -> Result<&'a ConditionValue> {
        let idx = self.table.condition_index(name)?;
        // Runs are never empty by construction.
        Ok(&self.rows[0].conditions[idx])
    }

    /// `(tick, value)` pairs for one metric, ascending by tick
    pub fn series(&self, metric: &str) -> Result<Vec<(Tick, f64)>> {
        let idx = self.table.metric_index(metric)?;
        Ok(self.rows.iter().map(|r| (r.tick, r.metrics[idx])).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cv(s: &str) -> ConditionValue {
        ConditionValue::categorical(s)
    }

    fn sample() -> Table {
        Table::new(
            vec!["truth".into()],
            vec!["awareness".into()],
            true,
            vec![
                Row::new(1, 10, vec![cv("true")], vec![0.5]),
                Row::new(1, 0, vec![cv("true")], vec![0.0]),
                Row::new(2, 0, vec![cv("false")], vec![0.0]),
                Row::new(2, 5, vec![cv("false")], vec![0.7]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let table = sample();
        assert_eq!(table.len(), 4);
        assert_eq!(table.run_count(), 2);
        assert_eq!(table.tick_range(), Some((0, 10)));
        assert_eq!(table.metric_values("awareness").unwrap(), vec![0.5, 0.0, 0.0, 0.7]);
        assert_eq!(table.distinct_values("truth").unwrap().len(), 2);
        assert!(matches!(table.metric_index("missing"), Err(Error::Schema(_))));
    }

    #[test]
    fn test_runs_sorted_by_tick() {
        let table = sample();
        let runs = table.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id(), 1);
        assert_eq!(runs[0].series("awareness").unwrap(), vec![(0, 0.0), (10, 0.5)]);
        assert_eq!(runs[1].condition("truth").unwrap(), &cv("false"));
        assert!(table.run(3).is_none());
    }

    #[test]
    fn test_where_condition_returns_new_table() {
        let table = sample();
        let subset = table.where_condition("truth", &cv("true")).unwrap();
        assert_eq!(subset.len(), 2);
        assert_eq!(table.len(), 4);
        assert!(table.where_condition("missing", &cv("true")).is_err());
    }

    #[test]
    fn test_rejects_inconsistent_conditions() {
        let result = Table::new(
            vec!["truth".into()],
            vec!["m".into()],
            true,
            vec![
                Row::new(1, 0, vec![cv("true")], vec![0.0]),
                Row::new(1, 1, vec![cv("false")], vec![0.0]),
            ],
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_duplicate_ticks() {
        let result = Table::new(
            vec![],
            vec!["m".into()],
            true,
            vec![Row::new(1, 3, vec![], vec![0.0]), Row::new(1, 3, vec![], vec![1.0])],
        );
        assert!(result.is_err());

        let result = Table::new(
            vec![],
            vec!["m".into()],
            false,
            vec![Row::new(1, 0, vec![], vec![0.0]), Row::new(1, 0, vec![], vec![1.0])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_finite_and_shape() {
        let result = Table::new(vec![], vec!["m".into()], false, vec![Row::new(1, 0, vec![], vec![f64::NAN])]);
        assert!(result.is_err());

        let result = Table::new(vec![], vec!["m".into()], false, vec![Row::new(1, 0, vec![], vec![])]);
        assert!(result.is_err());

        let result = Table::new(vec!["m".into()], vec!["m".into()], false, vec![]);
        assert!(matches!(result, Err(Error::Schema(_))));
    }
}
