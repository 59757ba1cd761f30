//! Keyword arguments handed to transform constructors.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PolycalError, PolycalResult};

/// Keyword arguments as written in the config file.
pub type Kwargs = BTreeMap<String, KwargValue>;

/// A single keyword argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KwargValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl KwargValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            KwargValue::Bool(_) => "bool",
            KwargValue::Int(_) => "integer",
            KwargValue::Str(_) => "string",
            KwargValue::List(_) => "list",
        }
    }

    /// The value as it would appear in an event's JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            KwargValue::Bool(b) => serde_json::Value::Bool(*b),
            KwargValue::Int(i) => serde_json::Value::from(*i),
            KwargValue::Str(s) => serde_json::Value::String(s.clone()),
            KwargValue::List(items) => {
                serde_json::Value::Array(items.iter().cloned().map(Into::into).collect())
            }
        }
    }
}

/// A kwarg as TOML may nest it: `a.b = 1` arrives as the table `a = { b = 1 }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NestedKwarg {
    Value(KwargValue),
    Table(BTreeMap<String, NestedKwarg>),
}

/// Deserialize kwargs, joining nested table keys back into dotted paths.
pub(crate) fn deserialize_kwargs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Kwargs, D::Error> {
    let nested = BTreeMap::<String, NestedKwarg>::deserialize(deserializer)?;
    let mut kwargs = Kwargs::new();
    flatten_into(&mut kwargs, None, nested);
    Ok(kwargs)
}

fn flatten_into(kwargs: &mut Kwargs, prefix: Option<&str>, nested: BTreeMap<String, NestedKwarg>) {
    for (key, value) in nested {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key,
        };
        match value {
            NestedKwarg::Value(value) => {
                kwargs.insert(path, value);
            }
            NestedKwarg::Table(table) => flatten_into(kwargs, Some(&path), table),
        }
    }
}

/// Pulls typed arguments out of a [`Kwargs`] map and reports leftovers.
///
/// Every accessor consumes its key; [`KwargReader::finish`] fails if any
/// argument was never asked for.
pub struct KwargReader<'a> {
    transform: &'a str,
    remaining: BTreeMap<&'a str, &'a KwargValue>,
}

impl<'a> KwargReader<'a> {
    pub fn new(transform: &'a str, kwargs: &'a Kwargs) -> Self {
        KwargReader {
            transform,
            remaining: kwargs.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> PolycalError {
        PolycalError::kwarg(self.transform, message)
    }

    fn mismatch(&self, key: &str, expected: &str, got: &KwargValue) -> PolycalError {
        self.error(format!(
            "'{}' must be a {}, got a {}",
            key,
            expected,
            got.type_name()
        ))
    }

    pub fn optional_str(&mut self, key: &str) -> PolycalResult<Option<&'a str>> {
        match self.remaining.remove(key) {
            None => Ok(None),
            Some(KwargValue::Str(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.mismatch(key, "string", other)),
        }
    }

    pub fn required_str(&mut self, key: &str) -> PolycalResult<&'a str> {
        self.optional_str(key)?
            .ok_or_else(|| self.error(format!("missing required argument '{}'", key)))
    }

    pub fn optional_bool(&mut self, key: &str) -> PolycalResult<Option<bool>> {
        match self.remaining.remove(key) {
            None => Ok(None),
            Some(KwargValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.mismatch(key, "bool", other)),
        }
    }

    /// A list of strings; a single string counts as a one-element list.
    pub fn required_str_list(&mut self, key: &str) -> PolycalResult<Vec<&'a str>> {
        match self.remaining.remove(key) {
            None => Err(self.error(format!("missing required argument '{}'", key))),
            Some(KwargValue::List(items)) => Ok(items.iter().map(String::as_str).collect()),
            Some(KwargValue::Str(s)) => Ok(vec![s.as_str()]),
            Some(other) => Err(self.mismatch(key, "list of strings", other)),
        }
    }

    /// Take every argument not consumed so far, for transforms with open-ended kwargs.
    pub fn take_rest(&mut self) -> Vec<(&'a str, &'a KwargValue)> {
        std::mem::take(&mut self.remaining).into_iter().collect()
    }

    pub fn finish(self) -> PolycalResult<()> {
        if self.remaining.is_empty() {
            return Ok(());
        }
        let unknown: Vec<&str> = self.remaining.keys().copied().collect();
        Err(self.error(format!("unknown argument(s): {}", unknown.join(", "))))
    }
}
