use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A single collected answer.
///
/// `Exact` carries the numeric value typed into a field's none-fallback entry,
/// so it is kept apart from a plain `Number` answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnswerRecord", into = "AnswerRecord")]
pub enum AnswerValue {
    Number(f64),
    Flag(bool),
    Choice(String),
    Choices(BTreeSet<String>),
    Exact(f64),
}

impl AnswerValue {
    pub fn choice(value: &str) -> Self {
        Self::Choice(value.to_string())
    }

    pub fn choices<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        Self::Choices(values.into_iter().map(str::to_string).collect())
    }

    /// Numeric reading of the answer when no coefficient table applies.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) | AnswerValue::Exact(value) => Some(*value),
            AnswerValue::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            AnswerValue::Choice(raw) => raw.trim().parse::<f64>().ok(),
            AnswerValue::Choices(_) => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            AnswerValue::Number(value) => value.to_string(),
            AnswerValue::Flag(flag) => flag.to_string(),
            AnswerValue::Choice(value) => value.clone(),
            AnswerValue::Choices(values) => {
                let joined: Vec<&str> = values.iter().map(String::as_str).collect();
                format!("[{}]", joined.join(", "))
            }
            AnswerValue::Exact(value) => format!("exact {value}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AnswerRecord {
    Number(f64),
    Flag(bool),
    Choice(String),
    Choices(BTreeSet<String>),
    Exact { exact: f64 },
}

impl From<AnswerRecord> for AnswerValue {
    fn from(record: AnswerRecord) -> Self {
        match record {
            AnswerRecord::Number(value) => AnswerValue::Number(value),
            AnswerRecord::Flag(flag) => AnswerValue::Flag(flag),
            AnswerRecord::Choice(value) => AnswerValue::Choice(value),
            AnswerRecord::Choices(values) => AnswerValue::Choices(values),
            AnswerRecord::Exact { exact } => AnswerValue::Exact(exact),
        }
    }
}

impl From<AnswerValue> for AnswerRecord {
    fn from(value: AnswerValue) -> Self {
        match value {
            AnswerValue::Number(value) => AnswerRecord::Number(value),
            AnswerValue::Flag(flag) => AnswerRecord::Flag(flag),
            AnswerValue::Choice(value) => AnswerRecord::Choice(value),
            AnswerValue::Choices(values) => AnswerRecord::Choices(values),
            AnswerValue::Exact(exact) => AnswerRecord::Exact { exact },
        }
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::choice(value)
    }
}

/// Answers keyed by input key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<AnswerValue>) -> Option<AnswerValue> {
        self.0.insert(key.to_string(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<AnswerValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
