//! Groups of runs sharing one condition-value assignment

use rumor_core::{ConditionValue, Result, RunId, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Condition values identifying a group, aligned with the partition's
/// condition list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(pub Vec<ConditionValue>);

impl GroupKey {
    pub fn new(values: Vec<ConditionValue>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[ConditionValue] {
        &self.0
    }
}

impl From<ConditionValue> for GroupKey {
    fn from(value: ConditionValue) -> Self {
        Self(vec![value])
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self(vec![ConditionValue::categorical(value)])
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" / "))
    }
}

/// The observations of every run with one condition-value assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: GroupKey,
    conditions: Vec<String>,
    table: Table,
}

impl Group {
    pub(crate) fn new(key: GroupKey, conditions: Vec<String>, table: Table) -> Self {
        Self {
            key,
            conditions,
            table,
        }
    }

    /// Treat a whole table as one group (no partitioning condition)
    pub fn whole(table: Table) -> Self {
        Self::new(GroupKey::new(Vec::new()), Vec::new(), table)
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Names of the conditions that define this group
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn run_ids(&self) -> BTreeSet<RunId> {
        self.table.run_ids()
    }

    pub fn run_count(&self) -> usize {
        self.table.run_count()
    }

    /// Number of observations (rows)
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All observations of one metric
    pub fn values(&self, metric: &str) -> Result<Vec<f64>> {
        self.table.metric_values(metric)
    }

    /// Human-facing label such as `rumor-is-true?=false`
    pub fn label(&self) -> String {
        if self.conditions.is_empty() {
            return "all".to_string();
        }
        self.conditions
            .iter()
            .zip(self.key.values())
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumor_core::Row;

    #[test]
    fn test_group_label_and_key() {
        let table = Table::new(
            vec!["truth".into(), "network".into()],
            vec!["m".into()],
            false,
            vec![Row::new(
                1,
                0,
                vec![ConditionValue::boolean(false), ConditionValue::categorical("random")],
                vec![1.0],
            )],
        )
        .unwrap();
        let key = GroupKey::new(table.rows()[0].conditions.clone());
        let group = Group::new(key, table.conditions().to_vec(), table);

        assert_eq!(group.label(), "truth=false, network=random");
        assert_eq!(group.key().to_string(), "false / random");
        assert_eq!(group.values("m").unwrap(), vec![1.0]);
        assert_eq!(group.run_count(), 1);
    }

    #[test]
    fn test_whole_group() {
        let table = Table::new(vec![], vec!["m".into()], false, vec![]).unwrap();
        let group = Group::whole(table);
        assert_eq!(group.label(), "all");
        assert!(group.is_empty());
    }
}
