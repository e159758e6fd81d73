//! Core types for rumor simulation analysis
//!
//! This crate provides the normalized table model every other rumor-stats
//! crate works on, the validated condition domains, metric descriptions,
//! shared descriptive statistics and the unified error type.
//!
//! # Example
//!
//! ```rust
//! use rumor_core::{ConditionValue, Row, Table};
//!
//! let table = Table::new(
//!     vec!["rumor-is-true?".to_string()],
//!     vec!["awareness".to_string()],
//!     false,
//!     vec![
//!         Row::new(1, 0, vec![ConditionValue::boolean(true)], vec![0.4]),
//!         Row::new(2, 0, vec![ConditionValue::boolean(false)], vec![0.7]),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(table.run_count(), 2);
//! ```

pub mod condition;
pub mod error;
pub mod math;
pub mod metric;
pub mod table;

// Re-export core types
pub use condition::{ConditionKind, ConditionSpec, ConditionValue};
pub use error::{Error, Result};
pub use math::Descriptive;
pub use metric::MetricSpec;
pub use table::{Row, Run, RunId, Table, Tick};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConditionKind, ConditionSpec, ConditionValue, Descriptive, Error, MetricSpec, Result, Row,
        Run, RunId, Table, Tick,
    };
}
