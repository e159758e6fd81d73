//! Pipeline configuration

use rumor_core::{Error, Result};
use rumor_data::NormalizerConfig;
use rumor_timeseries::DEFAULT_MIN_GROWTH_POINTS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_min_growth_points() -> usize {
    DEFAULT_MIN_GROWTH_POINTS
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Settings shared by every experiment of a pipeline run
///
/// Loaded from JSON; every field has a default so `{}` is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Input file format
    #[serde(flatten)]
    pub input: NormalizerConfig,
    /// Runs with fewer observations are left out of growth-rate statistics
    #[serde(default = "default_min_growth_points")]
    pub min_growth_points: usize,
    /// Experiment files are resolved against this directory
    #[serde(default = "default_dir")]
    pub data_dir: PathBuf,
    /// Summary tables are written here
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_true")]
    pub write_summaries: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: NormalizerConfig::default(),
            min_growth_points: default_min_growth_points(),
            data_dir: default_dir(),
            output_dir: default_dir(),
            write_summaries: true,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid configuration: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("cannot serialize configuration: {e}")))
    }

    pub fn with_input(mut self, input: NormalizerConfig) -> Self {
        self.input = input;
        self
    }

    pub fn with_min_growth_points(mut self, min_points: usize) -> Self {
        self.min_growth_points = min_points;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_write_summaries(mut self, enabled: bool) -> Self {
        self.write_summaries = enabled;
        self
    }
}
