//! Experimental conditions and their validated value domains

use crate::{Error, Result};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single condition value
///
/// Continuous values are wrapped in [`OrderedFloat`] so that values can be
/// used as partition keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// Numeric level (heterogeneity, learning rate, ...)
    Numeric(OrderedFloat<f64>),
    /// Categorical level, already cleaned of quoting
    Categorical(String),
}

impl ConditionValue {
    /// Create a categorical value
    pub fn categorical(value: impl Into<String>) -> Self {
        Self::Categorical(value.into())
    }

    /// Create a numeric value
    pub fn numeric(value: f64) -> Self {
        Self::Numeric(OrderedFloat(value))
    }

    /// Canonical boolean value (`"true"` / `"false"`)
    pub fn boolean(value: bool) -> Self {
        Self::Categorical(if value { "true" } else { "false" }.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(v.into_inner()),
            Self::Categorical(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Categorical(s) => Some(s),
            Self::Numeric(_) => None,
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{}", v.into_inner()),
            Self::Categorical(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        Self::categorical(value)
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        Self::numeric(value)
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

/// Domain of a condition column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionKind {
    /// Truth-value column, canonicalized to lowercase `"true"` / `"false"`
    Boolean,
    /// Categorical column; an empty domain accepts any value
    Categorical {
        #[serde(default)]
        domain: Vec<String>,
    },
    /// Numeric level
    Continuous,
}

impl ConditionKind {
    /// Categorical kind with an enumerated domain
    pub fn enumerated<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical {
            domain: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Categorical kind accepting any value
    pub fn open() -> Self {
        Self::Categorical { domain: Vec::new() }
    }
}

/// A named condition column with its domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: ConditionKind,
}

impl ConditionSpec {
    pub fn new(name: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ConditionKind::Boolean)
    }

    pub fn continuous(name: impl Into<String>) -> Self {
        Self::new(name, ConditionKind::Continuous)
    }

    pub fn categorical<I, S>(name: impl Into<String>, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, ConditionKind::enumerated(domain))
    }

    /// Validate an already-unquoted token against this condition's domain
    pub fn parse(&self, token: &str) -> Result<ConditionValue> {
        match &self.kind {
            ConditionKind::Boolean => match token.to_ascii_lowercase().as_str() {
                "true" => Ok(ConditionValue::boolean(true)),
                "false" => Ok(ConditionValue::boolean(false)),
                other => Err(Error::Schema(format!(
                    "value '{other}' is not a boolean for condition '{}'",
                    self.name
                ))),
            },
            ConditionKind::Categorical { domain } => {
                if domain.is_empty() || domain.iter().any(|d| d == token) {
                    Ok(ConditionValue::categorical(token))
                } else {
                    Err(Error::Schema(format!(
                        "value '{token}' is outside the domain of condition '{}' ({})",
                        self.name,
                        domain.join(", ")
                    )))
                }
            }
            ConditionKind::Continuous => {
                let value: f64 = token.parse().map_err(|_| {
                    Error::Parse(format!(
                        "value '{token}' of condition '{}' is not numeric",
                        self.name
                    ))
                })?;
                if !value.is_finite() {
                    return Err(Error::non_finite(&format!("condition '{}'", self.name)));
                }
                Ok(ConditionValue::numeric(value))
            }
        }
    }
}
