//! Parameter nodes: domains, resolved values and sub-parameter relationships.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use ev_types::ParameterError;

/// Position of a parameter inside its [`ParameterSpace`](crate::ParameterSpace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterId(pub(crate) usize);

impl ParameterId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The set of values a parameter may take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Domain {
    /// Finite ordered list of labels.
    Categorical { labels: Vec<String> },
    /// Finite ordered list of integers.
    CategoricalInteger { values: Vec<i64> },
    /// Integer range [min, max] inclusive.
    Integer { min: i64, max: i64 },
    /// Continuous range [min, max].
    Real { min: f64, max: f64 },
    Boolean,
    /// Free text, settable by `parse` only.
    Text,
}

/// A resolved parameter value (also used for non-configurable constants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Reals, and integers widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl Domain {
    /// Check the domain itself is well formed.
    pub(crate) fn validate_definition(&self, name: &str) -> Result<(), ParameterError> {
        let invalid = |message: String| ParameterError::InvalidDefinition {
            name: name.to_string(),
            message,
        };
        match self {
            Self::Categorical { labels } => {
                if labels.is_empty() {
                    return Err(invalid("the list of valid values cannot be empty".into()));
                }
                let unique: HashSet<&String> = labels.iter().collect();
                if unique.len() != labels.len() {
                    return Err(invalid(format!(
                        "the list of valid values cannot contain duplicates: {labels:?}"
                    )));
                }
            }
            Self::CategoricalInteger { values } => {
                if values.is_empty() {
                    return Err(invalid("the list of valid values cannot be empty".into()));
                }
                let unique: HashSet<&i64> = values.iter().collect();
                if unique.len() != values.len() {
                    return Err(invalid(format!(
                        "the list of valid values cannot contain duplicates: {values:?}"
                    )));
                }
            }
            Self::Integer { min, max } => {
                if min >= max {
                    return Err(invalid(format!(
                        "lower bound {min} must be less than upper bound {max}"
                    )));
                }
            }
            Self::Real { min, max } => {
                if !(min.is_finite() && max.is_finite() && min < max) {
                    return Err(invalid(format!(
                        "lower bound {min} must be less than upper bound {max}"
                    )));
                }
            }
            Self::Boolean | Self::Text => {}
        }
        Ok(())
    }

    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Categorical { labels }, Value::Text(v)) => labels.iter().any(|l| l == v),
            (Self::CategoricalInteger { values }, Value::Integer(v)) => values.contains(v),
            (Self::Integer { min, max }, Value::Integer(v)) => v >= min && v <= max,
            (Self::Real { min, max }, Value::Real(v)) => v >= min && v <= max,
            (Self::Boolean, Value::Boolean(_)) => true,
            (Self::Text, Value::Text(_)) => true,
            _ => false,
        }
    }

    /// Whether the domain can be reached from a `[0, 1]` scalar.
    pub fn is_configurable(&self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Convert a literal token into a value of this domain.
    pub fn parse(&self, name: &str, literal: &str) -> Result<Value, ParameterError> {
        let malformed = |expected: &str| ParameterError::MalformedValue {
            name: name.to_string(),
            value: literal.to_string(),
            expected: expected.to_string(),
        };
        let value = match self {
            Self::Categorical { .. } | Self::Text => Value::Text(literal.to_string()),
            Self::CategoricalInteger { .. } | Self::Integer { .. } => Value::Integer(
                literal
                    .parse::<i64>()
                    .map_err(|_| malformed("an integer"))?,
            ),
            Self::Real { .. } => {
                let v = literal.parse::<f64>().map_err(|_| malformed("a real number"))?;
                if v.is_nan() {
                    return Err(malformed("a real number"));
                }
                Value::Real(v)
            }
            Self::Boolean => match literal {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => return Err(malformed("true or false")),
            },
        };
        self.check(name, value)
    }

    /// Map a scalar already known to lie in `[0, 1]` onto the domain.
    pub fn decode(&self, name: &str, u: f64) -> Result<Value, ParameterError> {
        let value = match self {
            Self::Categorical { labels } => Value::Text(labels[bucket(u, labels.len())].clone()),
            Self::CategoricalInteger { values } => Value::Integer(values[bucket(u, values.len())]),
            Self::Integer { min, max } => {
                Value::Integer(min + (u * (max - min) as f64).floor() as i64)
            }
            Self::Real { min, max } => Value::Real((min + u * (max - min)).clamp(*min, *max)),
            Self::Boolean => Value::Boolean(u >= 0.5),
            Self::Text => {
                return Err(ParameterError::NotConfigurable {
                    name: name.to_string(),
                })
            }
        };
        self.check(name, value)
    }

    /// Inverse of [`Domain::decode`]: a scalar that decodes back to `value`.
    ///
    /// Discrete values land in the middle of their bucket.
    pub fn encode(&self, name: &str, value: &Value) -> Result<f64, ParameterError> {
        let value = self.check(name, value.clone())?;
        let encoded = match (self, &value) {
            (Self::Categorical { labels }, Value::Text(v)) => {
                let index = labels.iter().position(|l| l == v).unwrap_or(0);
                (index as f64 + 0.5) / labels.len() as f64
            }
            (Self::CategoricalInteger { values }, Value::Integer(v)) => {
                let index = values.iter().position(|x| x == v).unwrap_or(0);
                (index as f64 + 0.5) / values.len() as f64
            }
            (Self::Integer { min, max }, Value::Integer(v)) => {
                (((v - min) as f64 + 0.5) / (max - min) as f64).min(1.0)
            }
            (Self::Real { min, max }, Value::Real(v)) => ((v - min) / (max - min)).clamp(0.0, 1.0),
            (Self::Boolean, Value::Boolean(v)) => {
                if *v {
                    0.75
                } else {
                    0.25
                }
            }
            _ => {
                return Err(ParameterError::NotConfigurable {
                    name: name.to_string(),
                })
            }
        };
        Ok(encoded)
    }

    fn check(&self, name: &str, value: Value) -> Result<Value, ParameterError> {
        if self.contains(&value) {
            Ok(value)
        } else {
            Err(ParameterError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
                domain: self.to_string(),
            })
        }
    }
}

/// Equal-width bucketing: `ceil(u * n) - 1`, clamped to a valid index.
fn bucket(u: f64, n: usize) -> usize {
    ((u * n as f64).ceil() as usize).saturating_sub(1).min(n - 1)
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categorical { labels } => write!(f, "[{}]", labels.join(", ")),
            Self::CategoricalInteger { values } => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", values.join(", "))
            }
            Self::Integer { min, max } => write!(f, "[{min}, {max}]"),
            Self::Real { min, max } => write!(f, "[{min}, {max}]"),
            Self::Boolean => write!(f, "[true, false]"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Activation rule of a conditional sub-parameter.
#[derive(Clone)]
pub enum Condition {
    /// Active when the parent's value equals this value.
    Equals(Value),
    /// Active when the predicate holds for the parent's value.
    Predicate {
        description: String,
        test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    },
}

impl Condition {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Equals(trigger) => trigger == value,
            Self::Predicate { test, .. } => test(value),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Equals(trigger) => trigger.to_string(),
            Self::Predicate { description, .. } => description.clone(),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(trigger) => f.debug_tuple("Equals").field(trigger).finish(),
            Self::Predicate { description, .. } => f
                .debug_struct("Predicate")
                .field("description", description)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionalSubParameter {
    pub condition: Condition,
    pub parameter: ParameterId,
}

/// A named, typed, self-validating configuration node.
///
/// Sub-parameters are referenced by id; the owning
/// [`ParameterSpace`](crate::ParameterSpace) holds the nodes and drives
/// recursive parsing, decoding and flattening.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    domain: Domain,
    value: Option<Value>,
    pub(crate) parent: Option<ParameterId>,
    pub(crate) global: Vec<ParameterId>,
    pub(crate) conditional: Vec<ConditionalSubParameter>,
    pub(crate) non_configurable: BTreeMap<String, Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
            value: None,
            parent: None,
            global: Vec::new(),
            conditional: Vec::new(),
            non_configurable: BTreeMap::new(),
        }
    }

    pub fn categorical<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            Domain::Categorical {
                labels: labels.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn categorical_integer(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(
            name,
            Domain::CategoricalInteger {
                values: values.into_iter().collect(),
            },
        )
    }

    pub fn integer(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(name, Domain::Integer { min, max })
    }

    pub fn real(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(name, Domain::Real { min, max })
    }

    /// A real parameter over [0, 1].
    pub fn probability(name: impl Into<String>) -> Self {
        Self::real(name, 0.0, 1.0)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, Domain::Boolean)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, Domain::Text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn parent(&self) -> Option<ParameterId> {
        self.parent
    }

    pub fn global_sub_parameters(&self) -> &[ParameterId] {
        &self.global
    }

    pub fn conditional_sub_parameters(&self) -> &[ConditionalSubParameter] {
        &self.conditional
    }

    pub fn non_configurable_sub_parameters(&self) -> &BTreeMap<String, Value> {
        &self.non_configurable
    }

    pub fn non_configurable(&self, key: &str) -> Option<&Value> {
        self.non_configurable.get(key)
    }

    /// Sub-parameters active under the current value: globals first, then
    /// the conditionals whose trigger matches, in declaration order.
    pub fn active_sub_parameters(&self) -> Vec<ParameterId> {
        let mut active = self.global.clone();
        if let Some(value) = &self.value {
            active.extend(
                self.conditional
                    .iter()
                    .filter(|c| c.condition.matches(value))
                    .map(|c| c.parameter),
            );
        }
        active
    }

    /// Every sub-parameter regardless of the current value.
    pub fn all_sub_parameters(&self) -> Vec<ParameterId> {
        let mut all = self.global.clone();
        all.extend(self.conditional.iter().map(|c| c.parameter));
        all
    }

    /// Set the value, rejecting anything outside the domain.
    pub fn set_value(&mut self, value: Value) -> Result<(), ParameterError> {
        self.value = Some(self.domain.check(&self.name, value)?);
        Ok(())
    }

    /// Read this parameter's `--name value` pair from `tokens`.
    ///
    /// Only this node is resolved; the space recurses into sub-parameters.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<&Value, ParameterError> {
        let key = format!("--{}", self.name);
        let literal = tokens
            .iter()
            .position(|t| t.as_ref() == key)
            .and_then(|i| tokens.get(i + 1))
            .ok_or_else(|| ParameterError::Missing {
                name: self.name.clone(),
            })?;
        let value = self.domain.parse(&self.name, literal.as_ref())?;
        Ok(self.value.insert(value))
    }

    /// Consume the scalar at `*cursor` and advance the cursor.
    pub fn decode(&mut self, vector: &[f64], cursor: &mut usize) -> Result<&Value, ParameterError> {
        let u = *vector.get(*cursor).ok_or_else(|| ParameterError::VectorTooShort {
            name: self.name.clone(),
            index: *cursor,
            length: vector.len(),
        })?;
        if !(0.0..=1.0).contains(&u) {
            return Err(ParameterError::VectorValueOutOfRange {
                index: *cursor,
                value: u,
            });
        }
        let value = self.domain.decode(&self.name, u)?;
        *cursor += 1;
        Ok(self.value.insert(value))
    }

    pub(crate) fn clear_value(&mut self) {
        self.value = None;
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {} (domain {})", self.name, value, self.domain),
            None => write!(f, "{}: unresolved (domain {})", self.name, self.domain),
        }
    }
}
