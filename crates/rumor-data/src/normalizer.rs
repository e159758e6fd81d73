//! BehaviorSpace-style CSV normalization

use crate::clean::{clean_token, is_boolean, looks_like_reporter, parse_index, parse_number};
use crate::schema::{NormalizerConfig, TableSchema};
use rumor_core::{ConditionKind, ConditionSpec, Error, MetricSpec, Result, Row, Table};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Output of normalization: the clean table plus every rejected cell
#[derive(Debug)]
pub struct NormalizedTable {
    pub table: Table,
    /// Condition specs aligned with `table.conditions()`
    pub conditions: Vec<ConditionSpec>,
    /// Metric specs aligned with `table.metrics()`
    pub metrics: Vec<MetricSpec>,
    /// One [`Error::MalformedValue`] per rejected cell
    pub rejected: Vec<Error>,
}

impl NormalizedTable {
    /// Data-row indices (0-based, after the header) that were dropped
    pub fn rejected_rows(&self) -> BTreeSet<usize> {
        self.rejected
            .iter()
            .filter_map(|e| match e {
                Error::MalformedValue { row, .. } => Some(*row),
                _ => None,
            })
            .collect()
    }

    pub fn metric_spec(&self, column: &str) -> Option<&MetricSpec> {
        self.metrics.iter().find(|m| m.column == column)
    }
}

enum Role {
    Run,
    Tick,
    Condition(ConditionSpec),
    Metric(MetricSpec),
    Ignored,
}

/// Reads fixed-format experiment tables into validated [`Table`]s
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    schema: TableSchema,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig, schema: TableSchema) -> Self {
        Self { config, schema }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Normalize the file at `path`
    ///
    /// A path that does not exist yields [`Error::MissingFile`], which callers
    /// treat as "skip", not as a failure of the whole run.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<NormalizedTable> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let file = File::open(path)?;
        self.read(file)
    }

    /// Normalize a table from any reader
    pub fn read<R: Read>(&self, reader: R) -> Result<NormalizedTable> {
        let mut buffered = BufReader::new(reader);
        let mut line = String::new();
        for skipped in 0..self.config.header_lines {
            line.clear();
            if buffered.read_line(&mut line)? == 0 {
                return Err(Error::Parse(format!(
                    "input ended after {skipped} of {} preamble lines",
                    self.config.header_lines
                )));
            }
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(buffered);
        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(from_csv)?
            .iter()
            .map(|h| clean_token(h).to_string())
            .collect();
        let records = csv_reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_csv)?;

        self.normalize(&headers, &records)
    }

    fn normalize(&self, headers: &[String], records: &[csv::StringRecord]) -> Result<NormalizedTable> {
        let Some(run_idx) = headers.iter().position(|h| h == &self.config.run_column) else {
            return Err(Error::missing_column(&self.config.run_column));
        };
        let tick_column = self
            .config
            .tick_columns
            .iter()
            .find(|candidate| headers.iter().any(|h| h == *candidate));

        let roles: Vec<Role> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| self.role_of(idx, name, run_idx, tick_column, records))
            .collect();

        let mut conditions = Vec::new();
        let mut metrics = Vec::new();
        for role in &roles {
            match role {
                Role::Condition(spec) => conditions.push(spec.clone()),
                Role::Metric(spec) => metrics.push(spec.clone()),
                _ => {}
            }
        }

        let mut rows = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for (row_idx, record) in records.iter().enumerate() {
            if record.len() != headers.len() {
                rejected.push(Error::MalformedValue {
                    row: row_idx,
                    column: "<record>".to_string(),
                    value: format!("{} fields, expected {}", record.len(), headers.len()),
                });
                continue;
            }
            match Self::parse_row(row_idx, record, headers, &roles) {
                Ok(row) => rows.push(row),
                Err(cell_errors) => rejected.extend(cell_errors),
            }
        }

        if !rejected.is_empty() {
            warn!(
                rejected_cells = rejected.len(),
                kept_rows = rows.len(),
                "dropped rows with malformed values"
            );
        }
        debug!(
            rows = rows.len(),
            conditions = conditions.len(),
            metrics = metrics.len(),
            has_ticks = tick_column.is_some(),
            "normalized table"
        );

        let table = Table::new(
            conditions.iter().map(|c| c.name.clone()).collect(),
            metrics.iter().map(|m| m.column.clone()).collect(),
            tick_column.is_some(),
            rows,
        )?;

        Ok(NormalizedTable {
            table,
            conditions,
            metrics,
            rejected,
        })
    }

    fn role_of(
        &self,
        idx: usize,
        name: &str,
        run_idx: usize,
        tick_column: Option<&String>,
        records: &[csv::StringRecord],
    ) -> Role {
        if name == self.config.run_column {
            return Role::Run;
        }
        if tick_column.is_some_and(|t| t == name) {
            return Role::Tick;
        }
        if let Some(metric) = self.schema.metric(name) {
            return Role::Metric(metric.clone());
        }
        if let Some(condition) = self.schema.condition(name) {
            return Role::Condition(condition.clone());
        }
        if !self.schema.infer_undeclared {
            return Role::Ignored;
        }
        if looks_like_reporter(name) {
            return Role::Metric(MetricSpec::new(name));
        }
        // A condition is fixed per run; anything that moves within a run is
        // an observation.
        if varies_within_run(idx, run_idx, records) {
            if infer_kind(idx, records) == ConditionKind::Continuous {
                debug!(column = name, "undeclared column varies within runs, treating as metric");
                return Role::Metric(MetricSpec::new(name));
            }
            warn!(column = name, "undeclared non-numeric column varies within runs, ignoring");
            return Role::Ignored;
        }
        Role::Condition(ConditionSpec::new(name, infer_kind(idx, records)))
    }

    fn parse_row(
        row_idx: usize,
        record: &csv::StringRecord,
        headers: &[String],
        roles: &[Role],
    ) -> std::result::Result<Row, Vec<Error>> {
        let mut errors = Vec::new();
        let mut run = None;
        let mut tick = 0;
        let mut conditions = Vec::new();
        let mut metrics = Vec::new();

        let malformed = |column: &str, raw: &str| Error::MalformedValue {
            row: row_idx,
            column: column.to_string(),
            value: raw.to_string(),
        };

        for ((raw, column), role) in record.iter().zip(headers).zip(roles) {
            let token = clean_token(raw);
            match role {
                Role::Run => match parse_index(token) {
                    Some(id) => run = Some(id),
                    None => errors.push(malformed(column.as_str(), raw)),
                },
                Role::Tick => match parse_index(token) {
                    Some(t) => tick = t,
                    None => errors.push(malformed(column.as_str(), raw)),
                },
                Role::Condition(spec) => match spec.parse(token) {
                    Ok(value) => conditions.push(value),
                    Err(_) => errors.push(malformed(column.as_str(), raw)),
                },
                Role::Metric(_) => match parse_number(token) {
                    Some(value) => metrics.push(value),
                    None => errors.push(malformed(column.as_str(), raw)),
                },
                Role::Ignored => {}
            }
        }

        match run {
            Some(run) if errors.is_empty() => Ok(Row::new(run, tick, conditions, metrics)),
            _ => Err(errors),
        }
    }
}

/// Infer a condition's domain from its column contents
fn infer_kind(idx: usize, records: &[csv::StringRecord]) -> ConditionKind {
    let tokens: Vec<&str> = records
        .iter()
        .filter_map(|r| r.get(idx))
        .map(clean_token)
        .collect();
    if tokens.is_empty() {
        return ConditionKind::open();
    }
    if tokens.iter().all(|t| is_boolean(t)) {
        ConditionKind::Boolean
    } else if tokens.iter().all(|t| parse_number(t).is_some()) {
        ConditionKind::Continuous
    } else {
        ConditionKind::open()
    }
}

/// Whether a column takes more than one value within any single run
fn varies_within_run(idx: usize, run_idx: usize, records: &[csv::StringRecord]) -> bool {
    let mut first_seen: HashMap<&str, &str> = HashMap::new();
    records.iter().any(|record| {
        let (Some(run), Some(value)) = (record.get(run_idx), record.get(idx)) else {
            return false;
        };
        let value = clean_token(value);
        *first_seen.entry(clean_token(run)).or_insert(value) != value
    })
}

fn from_csv(err: csv::Error) -> Error {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io(io),
        other => Error::Parse(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumor_core::ConditionValue;

    const PREAMBLE: &str = "\"BehaviorSpace results (NetLogo 6.3.0)\"\n\"rumor.nlogo\"\n\"exp1\"\n\"01/01/2025 10:00:00\"\n\"min-pxcor\",\"max-pxcor\"\n\"-16\",\"16\"\n";

    fn input(body: &str) -> String {
        format!("{PREAMBLE}{body}")
    }

    #[test]
    fn test_skips_preamble_and_cleans_values() {
        let csv = input(
            "\"[run number]\",\"rumor-is-true?\",\"network-type\",\"mean [belief] of turtles\"\n\
             \"1\",\"true\",\"\"\"random\"\"\",\"0.4\"\n\
             \"2\",\"\"\"FALSE\"\"\",\"\"\"scale-free\"\"\",\"0.6\"\n",
        );
        let normalized = Normalizer::default().read(csv.as_bytes()).unwrap();
        let table = &normalized.table;
        assert_eq!(table.conditions(), ["rumor-is-true?", "network-type"]);
        assert_eq!(table.metrics(), ["mean [belief] of turtles"]);
        assert!(!table.has_ticks());
        assert_eq!(
            table.condition_values("rumor-is-true?").unwrap(),
            vec![ConditionValue::categorical("true"), ConditionValue::categorical("false")]
        );
        assert_eq!(
            table.condition_values("network-type").unwrap()[0],
            ConditionValue::categorical("random")
        );
        assert_eq!(normalized.conditions[0].kind, ConditionKind::Boolean);
        assert!(normalized.rejected.is_empty());
    }

    #[test]
    fn test_tick_column_detected() {
        let csv = input("[run number],[step],count informed\n1,0,0.0\n1,1,0.5\n2,0,0.0\n");
        let normalized = Normalizer::default().read(csv.as_bytes()).unwrap();
        assert!(normalized.table.has_ticks());
        assert_eq!(normalized.table.tick_range(), Some((0, 1)));
        assert_eq!(normalized.table.metrics(), ["count informed"]);
        assert_eq!(normalized.table.run(1).unwrap().len(), 2);
    }

    #[test]
    fn test_undeclared_series_column_becomes_metric() {
        let csv = input(
            "[run number],rumor-is-true?,ticks,informed-fraction,phase\n\
             1,true,0,0.1,early\n\
             1,true,1,0.4,late\n\
             2,false,0,0.2,early\n\
             2,false,1,0.7,late\n",
        );
        let normalized = Normalizer::default().read(csv.as_bytes()).unwrap();
        let table = &normalized.table;
        assert_eq!(table.conditions(), ["rumor-is-true?"]);
        assert_eq!(table.metrics(), ["informed-fraction"]);
        assert_eq!(table.run_count(), 2);
        assert_eq!(
            table.run(2).unwrap().series("informed-fraction").unwrap(),
            vec![(0, 0.2), (1, 0.7)]
        );
        assert!(normalized.rejected.is_empty());
    }

    #[test]
    fn test_missing_run_column() {
        let csv = input("run,x\n1,2\n");
        let result = Normalizer::default().read(csv.as_bytes());
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_short_preamble() {
        let result = Normalizer::default().read("only one line\n".as_bytes());
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_strict_schema_ignores_undeclared() {
        let csv = input("[run number],heterogeneity-level,count turtles,extra\n1,0.5,10,x\n");
        let schema = TableSchema::new()
            .with_condition(ConditionSpec::continuous("heterogeneity-level"))
            .with_metric(MetricSpec::new("count turtles"))
            .strict();
        let normalized = Normalizer::new(NormalizerConfig::default(), schema)
            .read(csv.as_bytes())
            .unwrap();
        assert_eq!(normalized.table.conditions(), ["heterogeneity-level"]);
        assert_eq!(normalized.table.metrics(), ["count turtles"]);
    }

    #[test]
    fn test_enumerated_domain_violation_is_scoped() {
        let csv = input("[run number],network-type,count x\n1,random,1\n2,lattice,2\n3,scale-free,3\n");
        let schema = TableSchema::new()
            .with_condition(ConditionSpec::categorical("network-type", ["random", "small-world", "scale-free"]));
        let normalized = Normalizer::new(NormalizerConfig::default(), schema)
            .read(csv.as_bytes())
            .unwrap();
        assert_eq!(normalized.table.run_count(), 2);
        assert_eq!(normalized.rejected_rows(), BTreeSet::from([1]));
    }
}
