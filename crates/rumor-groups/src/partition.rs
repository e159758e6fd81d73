//! Exhaustive, disjoint partitioning of a table's runs

use crate::{Group, GroupKey};
use rumor_core::{ConditionValue, Descriptive, Error, Result, Table};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Groups keyed by condition values, in ascending key order
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    conditions: Vec<String>,
    groups: BTreeMap<GroupKey, Group>,
}

impl Partition {
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&Group> {
        self.groups.get(key)
    }

    /// Group of a single-condition partition
    pub fn get_value(&self, value: &ConditionValue) -> Option<&Group> {
        self.groups.get(&GroupKey::from(value.clone()))
    }

    /// Like [`Partition::get`] but an absent group is `InvalidInput`
    pub fn require(&self, key: &GroupKey) -> Result<&Group> {
        self.get(key).ok_or_else(|| {
            Error::InvalidInput(format!("no runs with condition value(s) {key}"))
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Group)> {
        self.groups.iter()
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups.into_values().collect()
    }
}

/// Partition a table by one condition
pub fn partition(table: &Table, condition: &str) -> Result<Partition> {
    partition_by(table, &[condition])
}

/// Partition a table by the cross product of several conditions
///
/// Only combinations actually present in the table become groups.
pub fn partition_by(table: &Table, conditions: &[&str]) -> Result<Partition> {
    if conditions.is_empty() {
        return Err(Error::InvalidParameter(
            "at least one partitioning condition is required".to_string(),
        ));
    }
    let indices = conditions
        .iter()
        .map(|c| table.condition_index(c))
        .collect::<Result<Vec<_>>>()?;

    let key_of = |conds: &[ConditionValue]| {
        GroupKey::new(indices.iter().map(|&i| conds[i].clone()).collect())
    };
    let keys: BTreeSet<GroupKey> = table.rows().iter().map(|r| key_of(&r.conditions)).collect();

    let names: Vec<String> = conditions.iter().map(|c| c.to_string()).collect();
    let groups: BTreeMap<GroupKey, Group> = keys
        .into_iter()
        .map(|key| {
            let subset = table.filter(|r| key_of(&r.conditions) == key);
            (key.clone(), Group::new(key, names.clone(), subset))
        })
        .collect();

    debug!(
        conditions = ?names,
        groups = groups.len(),
        rows = table.len(),
        "partitioned table"
    );

    Ok(Partition {
        conditions: names,
        groups,
    })
}

/// Mean, standard deviation and sample size of a metric within a group
///
/// With fewer than two observations the standard deviation is NaN; callers
/// decide whether that is fatal.
pub fn describe(group: &Group, metric: &str) -> Result<Descriptive> {
    Ok(Descriptive::from_values(&group.values(metric)?))
}
