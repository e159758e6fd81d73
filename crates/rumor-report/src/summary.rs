//! Descriptive-statistics table of an experiment

use rumor_core::math::{mean, quantile_sorted, std_dev};
use rumor_core::{Error, Result, Table};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Describe-style statistics of one metric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl MetricSummary {
    pub fn from_values(metric: impl Into<String>, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            metric: metric.into(),
            count: values.len(),
            mean: mean(values),
            std: std_dev(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Statistics in the row order of the written table
    fn column(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Dataset facts and per-metric statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub rows: usize,
    pub runs: usize,
    pub conditions: Vec<String>,
    /// Conditions taking more than one value
    pub varied_conditions: Vec<String>,
    pub metrics: Vec<MetricSummary>,
}

impl TableSummary {
    pub fn metric(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.metric == name)
    }
}

/// Summarize every metric column of a table
pub fn summarize(table: &Table) -> Result<TableSummary> {
    let metrics = table
        .metrics()
        .iter()
        .map(|name| Ok(MetricSummary::from_values(name.as_str(), &table.metric_values(name)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut varied_conditions = Vec::new();
    for name in table.conditions() {
        if table.distinct_values(name)?.len() > 1 {
            varied_conditions.push(name.clone());
        }
    }

    Ok(TableSummary {
        rows: table.len(),
        runs: table.run_count(),
        conditions: table.conditions().to_vec(),
        varied_conditions,
        metrics,
    })
}

/// Write the statistics as CSV: one row per statistic, one column per metric
pub fn write_summary_csv<W: Write>(summary: &TableSummary, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![String::new()];
    header.extend(summary.metrics.iter().map(|m| m.metric.clone()));
    csv_writer.write_record(&header).map_err(csv_error)?;

    let columns: Vec<[f64; 8]> = summary.metrics.iter().map(MetricSummary::column).collect();
    for (i, statistic) in STATISTICS.iter().enumerate() {
        let mut record = vec![statistic.to_string()];
        record.extend(columns.iter().map(|c| format_cell(c[i])));
        csv_writer.write_record(&record).map_err(csv_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the statistics CSV to a file, creating parent directories
pub fn write_summary_file(summary: &TableSummary, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_summary_csv(summary, File::create(path)?)?;
    debug!(path = %path.display(), metrics = summary.metrics.len(), "wrote summary table");
    Ok(())
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn csv_error(e: csv::Error) -> Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io(io),
        other => Error::Parse(format!("CSV write failed: {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rumor_core::{ConditionValue, Row};

    fn table() -> Table {
        let cv = ConditionValue::categorical;
        Table::new(
            vec!["network-type".into(), "population".into()],
            vec!["awareness".into(), "belief".into()],
            false,
            vec![
                Row::new(1, 0, vec![cv("random"), cv("100")], vec![0.1, 0.5]),
                Row::new(2, 0, vec![cv("random"), cv("100")], vec![0.2, 0.5]),
                Row::new(3, 0, vec![cv("scale-free"), cv("100")], vec![0.3, 0.5]),
                Row::new(4, 0, vec![cv("scale-free"), cv("100")], vec![0.4, 0.5]),
                Row::new(5, 0, vec![cv("scale-free"), cv("100")], vec![0.5, 0.5]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&table()).unwrap();
        assert_eq!(summary.rows, 5);
        assert_eq!(summary.runs, 5);
        assert_eq!(summary.varied_conditions, vec!["network-type".to_string()]);

        let awareness = summary.metric("awareness").unwrap();
        assert_eq!(awareness.count, 5);
        assert_abs_diff_eq!(awareness.mean, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(awareness.min, 0.1);
        assert_abs_diff_eq!(awareness.q25, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(awareness.median, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(awareness.q75, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(awareness.max, 0.5);
        assert_abs_diff_eq!(summary.metric("belief").unwrap().std, 0.0);
    }

    #[test]
    fn test_interpolated_quartiles() {
        let summary = MetricSummary::from_values("m", &[4.0, 1.0, 3.0, 2.0]);
        // positions (n - 1) * p = 0.75, 1.5, 2.25
        assert_abs_diff_eq!(summary.q25, 1.75);
        assert_abs_diff_eq!(summary.median, 2.5);
        assert_abs_diff_eq!(summary.q75, 3.25);
    }

    #[test]
    fn test_empty_metric() {
        let summary = MetricSummary::from_values("m", &[]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan() && summary.min.is_nan() && summary.max.is_nan());
    }

    #[test]
    fn test_csv_layout() {
        let summary = summarize(&table()).unwrap();
        let mut buffer = Vec::new();
        write_summary_csv(&summary, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], ",awareness,belief");
        assert_eq!(lines[1], "count,5,5");
        assert!(lines[2].starts_with("mean,0.3"));
        assert!(lines[8].starts_with("max,0.5"));
    }

    #[test]
    fn test_undefined_std_is_blank() {
        let one = Table::new(vec![], vec!["m".into()], false, vec![Row::new(1, 0, vec![], vec![2.0])])
            .unwrap();
        let mut buffer = Vec::new();
        write_summary_csv(&summarize(&one).unwrap(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().any(|l| l == "std,"));
    }
}
