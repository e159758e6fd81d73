//! Plain-text summaries of analysis results

use crate::{ExperimentStatus, PipelineSummary, TableSummary};
use rumor_hypothesis::{AnovaResult, ComparisonResult, RegressionResult};
use rumor_timeseries::{GrowthSummary, SeriesFacts, Trajectory};
use std::fmt::Write;

/// Means, difference, t-test and effect size of a two-group comparison
pub fn render_comparison(result: &ComparisonResult, metric_label: &str) -> String {
    let mut out = String::new();
    let width = result.group_a.label.len().max(result.group_b.label.len());
    let _ = writeln!(out, "{metric_label}:");
    for side in [&result.group_a, &result.group_b] {
        let _ = writeln!(
            out,
            "  {:<width$}  {:.4} ± {:.4} (n={})",
            side.label, side.stats.mean, side.stats.std_dev, side.stats.n
        );
    }
    let _ = writeln!(out, "  Difference: {:+.4}", result.mean_difference());
    let _ = writeln!(
        out,
        "  T-test: t={:.3}, df={}, p={:.4} {}",
        result.t_statistic, result.degrees_of_freedom, result.p_value, result.significance
    );
    let _ = write!(out, "  Cohen's d: {}", result.effect);
    out
}

/// Fitted equation, R² and correlation test of a regression
pub fn render_regression(
    result: &RegressionResult,
    group: &str,
    condition: &str,
    metric_label: &str,
) -> String {
    let direction = if result.slope > 0.0 {
        "positive"
    } else if result.slope < 0.0 {
        "negative"
    } else {
        "flat"
    };
    let mut out = String::new();
    let _ = writeln!(out, "{group} (n={}):", result.n);
    let _ = writeln!(
        out,
        "  Equation: {metric_label} = {:.4} + {:.4} × {condition}",
        result.intercept, result.slope
    );
    let _ = writeln!(out, "  R² = {:.4}", result.r_squared);
    let _ = writeln!(out, "  Slope {direction}");
    let _ = write!(
        out,
        "  Correlation: r={:.3}, p={:.4} {}",
        result.r,
        result.p_value,
        result.significance()
    );
    out
}

/// Per-group means and the F-test of an ANOVA
pub fn render_anova(result: &AnovaResult, group: &str, metric_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{group} ({metric_label}):");
    let width = result.groups.iter().map(|g| g.label.len()).max().unwrap_or(0);
    for g in &result.groups {
        let _ = writeln!(
            out,
            "  {:<width$}  {:.4} ± {:.4} (n={})",
            g.label, g.stats.mean, g.stats.std_dev, g.stats.n
        );
    }
    let _ = write!(
        out,
        "  ANOVA: F={:.3} (df {}, {}), p={:.4} {}",
        result.f_statistic, result.df_between, result.df_within, result.p_value, result.significance
    );
    out
}

/// Run count and tick range of a time-series table
pub fn render_series_facts(facts: &SeriesFacts) -> String {
    match (facts.min_tick, facts.max_tick) {
        (Some(lo), Some(hi)) => format!(
            "Data contains {} runs\nTime range: {lo} to {hi} ticks",
            facts.runs
        ),
        _ => format!("Data contains {} runs\nNo observations", facts.runs),
    }
}

/// Start, end and peak of a mean trajectory
pub fn render_trajectory(trajectory: &Trajectory, metric_label: &str) -> String {
    let (Some(first), Some(last), Some(peak)) = (
        trajectory.points.first(),
        trajectory.last(),
        trajectory.peak(),
    ) else {
        return format!("{} ({metric_label}): no observations", trajectory.group);
    };
    format!(
        "{} ({metric_label}): {:.4} at tick {} -> {:.4} ± {:.4} at tick {} (peak {:.4} at tick {}, {} runs)",
        trajectory.group,
        first.mean,
        first.tick,
        last.mean,
        last.std_error,
        last.tick,
        peak.mean,
        peak.tick,
        first.n.max(last.n)
    )
}

/// Peak growth rate statistics of a group
pub fn render_growth(summary: &GrowthSummary, group: &str) -> String {
    let mut line = format!(
        "{group}: peak growth {:.4} ± {:.4} per tick over {} runs",
        summary.peak_rates.mean,
        summary.peak_rates.std_dev,
        summary.included()
    );
    if !summary.excluded.is_empty() {
        let _ = write!(
            line,
            " ({} runs with fewer than {} points excluded)",
            summary.excluded.len(),
            summary.min_points
        );
    }
    line
}

/// Dataset facts and the descriptive table
pub fn render_summary(summary: &TableSummary, experiment: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary report: {experiment}");
    let _ = writeln!(out, "  Total rows: {} ({} runs)", summary.rows, summary.runs);
    let _ = writeln!(out, "  Parameters varied: {:?}", summary.varied_conditions);
    let _ = write!(out, "  Metrics collected: {}", summary.metrics.len());
    for m in &summary.metrics {
        let _ = write!(
            out,
            "\n  {}: count={} mean={:.4} std={:.4} min={:.4} 25%={:.4} 50%={:.4} 75%={:.4} max={:.4}",
            m.metric, m.count, m.mean, m.std, m.min, m.q25, m.median, m.q75, m.max
        );
    }
    out
}

/// Succeeded and skipped/failed experiments of a pipeline run
pub fn render_tally(summary: &PipelineSummary) -> String {
    let mut out = String::new();
    let succeeded = summary.succeeded();
    if !succeeded.is_empty() {
        let _ = writeln!(out, "Successfully analyzed ({}):", succeeded.len());
        for name in &succeeded {
            let _ = writeln!(out, "  • {name}");
        }
    }
    let failed: Vec<_> = summary
        .experiments
        .iter()
        .filter(|e| !e.succeeded())
        .collect();
    if !failed.is_empty() {
        let _ = writeln!(out, "Skipped/Failed ({}):", failed.len());
        for report in failed {
            let reason = match &report.status {
                ExperimentStatus::Missing => "file not found".to_string(),
                ExperimentStatus::Failed { error } => error.clone(),
                ExperimentStatus::Succeeded => String::new(),
            };
            let _ = writeln!(out, "  • {} ({reason})", report.name);
        }
    }
    if succeeded.is_empty() {
        let _ = writeln!(out, "No experiments were analyzed");
    }
    let failed_analyses = summary.failed_analyses();
    if failed_analyses > 0 {
        let _ = writeln!(out, "{failed_analyses} individual analyses failed");
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumor_core::Descriptive;
    use rumor_hypothesis::{compare_samples, regress, GroupSummary};

    #[test]
    fn test_comparison_text() {
        let result = compare_samples(
            "awareness",
            GroupSummary::new("true", Descriptive::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0])),
            GroupSummary::new("false", Descriptive::from_values(&[3.0, 4.0, 5.0, 6.0, 7.0])),
        )
        .unwrap();
        let text = render_comparison(&result, "Awareness (%)");
        assert!(text.starts_with("Awareness (%):"));
        assert!(text.contains("Difference: +2.0000"));
        assert!(text.contains("t=2.000, df=8, p=0.0805 ns"));
        assert!(text.contains("Cohen's d: 1.265 (large effect)"));
    }

    #[test]
    fn test_regression_text() {
        let result = regress(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).unwrap();
        let text = render_regression(&result, "rumor-is-true?=true", "heterogeneity-level", "Awareness");
        assert!(text.contains("Equation: Awareness = 1.0000 + 2.0000 × heterogeneity-level"));
        assert!(text.contains("R² = 1.0000"));
        assert!(text.contains("Slope positive"));
        assert!(text.contains("***"));
    }

    #[test]
    fn test_series_facts_text() {
        let facts = SeriesFacts {
            runs: 20,
            observations: 2000,
            min_tick: Some(0),
            max_tick: Some(99),
        };
        assert_eq!(
            render_series_facts(&facts),
            "Data contains 20 runs\nTime range: 0 to 99 ticks"
        );
    }
}
