//! Ordered `name → (default, description)` maps for arguments and options.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Marker a declaration uses in place of a default to mean "this option
/// requires a value".
pub const REQUIRED_MARKER: &str = "@required";

/// Default value of an argument or option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum DefaultValue {
    /// The option takes a value and the caller must supply it.
    Required,
    Value(Value),
}

impl DefaultValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            DefaultValue::Required => None,
            DefaultValue::Value(v) => Some(v),
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, DefaultValue::Required)
    }

    /// Empty list, the default for array-typed arguments without one.
    pub fn empty_list() -> Self {
        DefaultValue::Value(Value::Array(Vec::new()))
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(ref s) if s == REQUIRED_MARKER => DefaultValue::Required,
            v => DefaultValue::Value(v),
        }
    }
}

impl From<DefaultValue> for Value {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Required => Value::String(REQUIRED_MARKER.to_string()),
            DefaultValue::Value(v) => v,
        }
    }
}

/// Deserialize a field that is `None` only when absent; an explicit `null`
/// becomes `Some`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// One argument or option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Insertion-ordered entries with unique names.
///
/// Argument order mirrors positional parameter order, so the order is part
/// of the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultsWithDescriptions {
    entries: IndexMap<String, Entry>,
}

impl DefaultsWithDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `name`. Replacing keeps the original position.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        default: Option<DefaultValue>,
        description: Option<String>,
    ) {
        self.entries
            .insert(name.into(), Entry { default, description });
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn default_of(&self, name: &str) -> Option<&DefaultValue> {
        self.entries.get(name).and_then(|e| e.default.as_ref())
    }

    pub fn description_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|e| e.description.as_deref())
    }

    /// Set the default of an existing entry. Returns false if `name` is unknown.
    pub fn set_default(&mut self, name: &str, default: DefaultValue) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.default = Some(default);
                true
            }
            None => false,
        }
    }

    /// Set the description of an existing entry. Returns false if `name` is unknown.
    pub fn set_description(&mut self, name: &str, description: impl Into<String>) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.description = Some(description.into());
                true
            }
            None => false,
        }
    }

    /// Rename `from` to `to` in place.
    ///
    /// Fails (returns false) when `from` is missing or `to` already names a
    /// different entry.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.exists(from);
        }
        if self.exists(to) {
            return false;
        }
        let Some(index) = self.entries.get_index_of(from) else {
            return false;
        };
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, (k, v))| if i == index { (to.to_string(), v) } else { (k, v) })
            .collect();
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.shift_remove(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a docblock's reference to an option against the stored keys.
    ///
    /// Tried in order, first match wins:
    /// 1. `name` is stored as-is.
    /// 2. `name` is combined (`long|s`) and one of its halves is stored.
    /// 3. some stored key shares a `|`-separated half with `name`. When
    ///    `name` is itself combined, the stored key is renamed to it;
    ///    otherwise the stored (combined) key is returned unchanged.
    /// 4. nothing matches: `name` is returned untouched.
    ///
    /// Never creates an entry.
    pub fn approximate_name(&mut self, name: &str) -> String {
        if self.exists(name) {
            return name.to_string();
        }

        let wanted: Vec<&str> = name.split('|').filter(|p| !p.is_empty()).collect();
        let combined = name.contains('|');
        if combined {
            if let Some(half) = wanted.iter().find(|half| self.exists(half)) {
                return half.to_string();
            }
        }

        let found = self
            .entries
            .keys()
            .find(|key| key.split('|').any(|part| wanted.contains(&part)))
            .cloned();
        match found {
            Some(key) if combined => {
                self.rename(&key, name);
                name.to_string()
            }
            Some(key) => key,
            None => name.to_string(),
        }
    }
}
