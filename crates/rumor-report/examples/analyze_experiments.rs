//! Analyse every experiment of a plan and print the reports
//!
//! ```text
//! cargo run -p rumor-report --example analyze_experiments -- [config.json] [plan.json] [figures.json]
//! ```
//!
//! Without arguments the default configuration and the eight-experiment rumor
//! plan are used, reading `results/*.csv` relative to the working directory.
//! Set `RUST_LOG=debug` for per-analysis logging.

use anyhow::{Context, Result};
use rumor_report::{text, AnalysisConfig, CollectingRenderer, ExperimentPlan, Pipeline};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => AnalysisConfig::from_path(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => AnalysisConfig::default(),
    };
    let plan = match args.next() {
        Some(path) => ExperimentPlan::from_path(&path)
            .with_context(|| format!("loading experiment plan from {path}"))?,
        None => ExperimentPlan::rumor_default(),
    };
    let figures_out = args.next();

    let renderer = CollectingRenderer::new();
    let summary = Pipeline::new(config, &renderer).run(&plan);

    for report in &summary.experiments {
        println!("{}", "=".repeat(70));
        println!("{}", report.name);
        println!("{}", "=".repeat(70));
        for line in &report.lines {
            println!("{line}\n");
        }
        for failed in report.failed_analyses() {
            println!("! {} failed: {:?}", failed.analysis, failed.outcome);
        }
    }

    println!("{}", "=".repeat(70));
    println!("{}", text::render_tally(&summary));

    if let Some(path) = figures_out {
        std::fs::write(&path, renderer.to_json()?)
            .with_context(|| format!("writing figures to {path}"))?;
        println!("\n{} figures written to {path}", renderer.len());
    }
    Ok(())
}
