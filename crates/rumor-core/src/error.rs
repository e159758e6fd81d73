//! Error types for rumor simulation analysis
//!
//! Provides a unified error type for all rumor-stats crates.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// An expected column is absent, or has the wrong kind for the request
    #[error("Schema error: {0}")]
    Schema(String),

    /// Group or sample size below what the requested statistic requires
    #[error("Insufficient data: expected at least {expected} observations, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Non-numeric or otherwise invalid cell found while normalizing a table
    #[error("Malformed value {value:?} at row {row}, column '{column}'")]
    MalformedValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Experiment input file does not exist
    #[error("Missing file: {}", .0.display())]
    MissingFile(PathBuf),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Input could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration or plan could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a column that is not part of the table
    pub fn missing_column(column: &str) -> Self {
        Self::Schema(format!("column '{column}' not found"))
    }

    /// Create an error for a sample below the required size
    pub fn insufficient(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Whether this error only means "skip and record", never "abort"
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::MissingFile(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_column("network-type");
        assert_eq!(err.to_string(), "Schema error: column 'network-type' not found");

        let err = Error::insufficient(2, 1);
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 observations, got 1"
        );

        let err = Error::MalformedValue {
            row: 3,
            column: "mean [belief] of turtles".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed value \"abc\" at row 3, column 'mean [belief] of turtles'"
        );

        let err = Error::MissingFile(PathBuf::from("results/exp1.csv"));
        assert_eq!(err.to_string(), "Missing file: results/exp1.csv");
        assert!(err.is_missing_file());
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(4, 3, "regression input");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in regression input: expected 4, got 3"
        );

        let err = Error::non_finite("metric column");
        assert_eq!(
            err.to_string(),
            "Invalid input: metric column contains NaN or infinite values"
        );
        assert!(!err.is_missing_file());
    }

    #[test]
    fn test_error_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => assert!(err.to_string().contains("file not found")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        assert!(matches!(err, Error::Other(_)));
        assert!(err.to_string().contains("custom error message"));
    }
}
