//! How arguments and options would be wired into a command-line parser.

use crate::defaults::{DefaultValue, Entry};
use cmdinfo_syntax::split_option_key;
use serde_json::Value;

/// Input shape of an option, decided by its default alone.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Boolean default: takes no value.
    Flag,
    ValueRequired,
    ValueOptional(Value),
    /// Empty list default: repeatable, at least one value.
    ArrayRequired,
    ArrayOptional(Vec<Value>),
}

impl InputMode {
    pub fn classify(default: Option<&DefaultValue>) -> Self {
        match default {
            Some(DefaultValue::Required) => InputMode::ValueRequired,
            Some(DefaultValue::Value(Value::Bool(_))) => InputMode::Flag,
            Some(DefaultValue::Value(Value::Array(items))) if items.is_empty() => InputMode::ArrayRequired,
            Some(DefaultValue::Value(Value::Array(items))) => InputMode::ArrayOptional(items.clone()),
            Some(DefaultValue::Value(v)) => InputMode::ValueOptional(v.clone()),
            None => InputMode::ValueOptional(Value::Null),
        }
    }
}

/// Positional argument shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentMode {
    Required,
    Optional(Value),
    /// Collects the remaining positionals.
    Array(Vec<Value>),
}

impl ArgumentMode {
    pub fn classify(default: Option<&DefaultValue>) -> Self {
        match default {
            None | Some(DefaultValue::Required) => ArgumentMode::Required,
            Some(DefaultValue::Value(Value::Array(items))) => ArgumentMode::Array(items.clone()),
            Some(DefaultValue::Value(v)) => ArgumentMode::Optional(v.clone()),
        }
    }
}

/// An option ready for registration.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub long: String,
    pub short: Option<String>,
    pub mode: InputMode,
    pub description: Option<String>,
}

impl OptionSpec {
    pub fn from_entry(key: &str, entry: &Entry) -> Self {
        let (long, short) = split_option_key(key);
        Self {
            long: long.to_string(),
            short: short.map(str::to_string),
            mode: InputMode::classify(entry.default.as_ref()),
            description: entry.description.clone(),
        }
    }

    /// `-s, --silent`, `--format[=FORMAT]`, `--uri=URI`, `--field=FIELD...`
    pub fn synopsis(&self) -> String {
        let mut out = String::new();
        if let Some(ref short) = self.short {
            out.push_str(&format!("-{}, ", short));
        }
        out.push_str("--");
        out.push_str(&self.long);

        let placeholder = self.long.to_uppercase().replace('-', "_");
        match self.mode {
            InputMode::Flag => {}
            InputMode::ValueRequired => out.push_str(&format!("={}", placeholder)),
            InputMode::ValueOptional(_) => out.push_str(&format!("[={}]", placeholder)),
            InputMode::ArrayRequired => out.push_str(&format!("={}...", placeholder)),
            InputMode::ArrayOptional(_) => out.push_str(&format!("[={}...]", placeholder)),
        }
        out
    }

    /// Default worth showing in help, if any.
    pub fn shown_default(&self) -> Option<String> {
        match &self.mode {
            InputMode::ValueOptional(Value::Null) => None,
            InputMode::ValueOptional(v) => Some(v.to_string()),
            InputMode::ArrayOptional(items) => Some(Value::Array(items.clone()).to_string()),
            _ => None,
        }
    }
}

/// `<name>`, `[<name>]` or `[<name>...]`.
pub fn argument_synopsis(name: &str, mode: &ArgumentMode) -> String {
    match mode {
        ArgumentMode::Required => format!("<{}>", name),
        ArgumentMode::Optional(_) => format!("[<{}>]", name),
        ArgumentMode::Array(_) => format!("[<{}>...]", name),
    }
}
