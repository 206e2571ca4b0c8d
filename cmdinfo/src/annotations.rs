//! Open-ended `@tag` storage with multi-value merge.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value recorded for one annotation name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Scalar(String),
    List(Vec<String>),
}

impl AnnotationValue {
    /// All values, as a list view.
    pub fn values(&self) -> Vec<&str> {
        match self {
            AnnotationValue::Scalar(s) => vec![s.as_str()],
            AnnotationValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// The most recently recorded value.
    pub fn last(&self) -> Option<&str> {
        match self {
            AnnotationValue::Scalar(s) => Some(s),
            AnnotationValue::List(items) => items.last().map(String::as_str),
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Scalar(s) => f.write_str(s),
            AnnotationValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Annotations not captured by a dedicated descriptor field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationBag {
    entries: IndexMap<String, AnnotationValue>,
}

impl AnnotationBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `name`; repeated names accumulate into a list.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(name.into()) {
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(AnnotationValue::Scalar(value));
            }
            indexmap::map::Entry::Occupied(mut slot) => match slot.get_mut() {
                AnnotationValue::List(items) => items.push(value),
                current => {
                    let first = current.to_string();
                    *current = AnnotationValue::List(vec![first, value]);
                }
            },
        }
    }

    /// Replace whatever `name` holds.
    pub fn set(&mut self, name: impl Into<String>, value: AnnotationValue) {
        self.entries.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<AnnotationValue> {
        self.entries.shift_remove(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AnnotationValue> {
        self.entries.get(name)
    }

    /// Values of `name` as a list, empty when absent.
    pub fn get_list(&self, name: &str) -> Vec<&str> {
        self.entries.get(name).map(|v| v.values()).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
