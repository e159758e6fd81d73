//! Repeated-measures aggregation for simulation runs
//!
//! Time-series experiments record every run at many ticks. This crate
//! reduces them three ways:
//!
//! - [`final_snapshot`] keeps each run's last observation, turning the
//!   experiment into an ordinary one-row-per-run table
//! - [`mean_trajectory`] averages a group's runs tick by tick with a 95% band
//! - [`growth_rate`] finds the steepest rise of a metric within a run
//!
//! # Example
//!
//! ```rust
//! use rumor_core::{ConditionValue, Row, Table};
//! use rumor_timeseries::final_snapshot;
//!
//! let network = vec![ConditionValue::categorical("small-world")];
//! let table = Table::new(
//!     vec!["network-type".into()],
//!     vec!["awareness".into()],
//!     true,
//!     vec![
//!         Row::new(1, 0, network.clone(), vec![0.0]),
//!         Row::new(1, 50, network.clone(), vec![0.8]),
//!     ],
//! )
//! .unwrap();
//!
//! let last = final_snapshot(&table);
//! assert_eq!(last.len(), 1);
//! assert_eq!(last.rows()[0].tick, 50);
//! ```

mod growth;
mod snapshot;
mod trajectory;

pub use growth::{growth_rate, growth_rates, GrowthRecord, GrowthSummary};
pub use snapshot::{final_snapshot, series_facts, SeriesFacts};
pub use trajectory::{mean_trajectory, trajectories, Trajectory, TrajectoryPoint};

/// Minimum observations for a run to enter growth-rate aggregation unless
/// configured otherwise
pub const DEFAULT_MIN_GROWTH_POINTS: usize = 10;
