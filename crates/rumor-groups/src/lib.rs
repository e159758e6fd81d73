//! Grouping of simulation runs by condition values
//!
//! A partition splits a normalized table into disjoint groups, one per
//! distinct condition value (or per present combination of several
//! conditions). Every row lands in exactly one group and groups are kept in
//! ascending key order so downstream reports are deterministic.
//!
//! # Example
//!
//! ```rust
//! use rumor_core::{ConditionValue, Row, Table};
//! use rumor_groups::{describe, partition};
//!
//! let table = Table::new(
//!     vec!["rumor-is-true?".into()],
//!     vec!["awareness".into()],
//!     false,
//!     vec![
//!         Row::new(1, 0, vec![ConditionValue::boolean(true)], vec![0.4]),
//!         Row::new(2, 0, vec![ConditionValue::boolean(true)], vec![0.6]),
//!         Row::new(3, 0, vec![ConditionValue::boolean(false)], vec![0.9]),
//!     ],
//! )
//! .unwrap();
//!
//! let groups = partition(&table, "rumor-is-true?").unwrap();
//! let truthful = groups.get_value(&ConditionValue::boolean(true)).unwrap();
//! let summary = describe(truthful, "awareness").unwrap();
//! assert_eq!(summary.n, 2);
//! assert!((summary.mean - 0.5).abs() < 1e-12);
//! ```

mod group;
mod partition;

pub use group::{Group, GroupKey};
pub use partition::{describe, partition, partition_by, Partition};
