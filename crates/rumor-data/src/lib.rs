//! Dataset normalization for rumor simulation output
//!
//! Experiment files are CSV tables preceded by a fixed number of preamble
//! lines. The [`Normalizer`] discards the preamble, assigns each column a role
//! (run id, tick, condition, metric), cleans quoted values, validates
//! condition values against their declared domain and produces a
//! [`rumor_core::Table`]. Malformed cells reject only their own row; every
//! rejection is reported as [`rumor_core::Error::MalformedValue`].
//!
//! # Example
//!
//! ```rust
//! use rumor_data::{Normalizer, NormalizerConfig, TableSchema};
//!
//! let csv = "[run number],rumor-is-true?,mean [belief] of turtles\n1,true,0.4\n2,false,oops\n";
//! let normalizer = Normalizer::new(
//!     NormalizerConfig::default().with_header_lines(0),
//!     TableSchema::new(),
//! );
//! let normalized = normalizer.read(csv.as_bytes()).unwrap();
//!
//! assert_eq!(normalized.table.run_count(), 1);
//! assert_eq!(normalized.rejected.len(), 1);
//! ```

pub mod clean;
mod normalizer;
mod schema;

pub use normalizer::{NormalizedTable, Normalizer};
pub use schema::{NormalizerConfig, TableSchema};
