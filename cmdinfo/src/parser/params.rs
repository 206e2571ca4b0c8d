//! Parameter list → positional arguments and options.

use crate::defaults::{DefaultValue, DefaultsWithDescriptions};
use crate::reflect::{ParamKind, Parameter};
use serde_json::Value;

pub(crate) struct Classified {
    pub arguments: DefaultsWithDescriptions,
    pub options: DefaultsWithDescriptions,
    pub options_bag: Option<String>,
}

/// Associative defaults (maps) mark an options bag; lists do not.
fn is_associative(value: &Value) -> bool {
    value.is_object()
}

/// Classify declared parameters.
///
/// Only the last parameter can be the options bag: each key of its
/// associative default becomes an option. Class-typed parameters are
/// injected collaborators and are skipped.
pub(crate) fn classify(params: &[Parameter]) -> Classified {
    let mut arguments = DefaultsWithDescriptions::new();
    let mut options = DefaultsWithDescriptions::new();
    let mut options_bag = None;

    let mut positional = params;
    if let Some((last, rest)) = params.split_last() {
        if let Some(Value::Object(map)) = &last.default {
            for (key, value) in map {
                options.add(key.clone(), Some(DefaultValue::from(value.clone())), None);
            }
            options_bag = Some(last.name.clone());
            positional = rest;
        }
    }

    for param in positional {
        let kind = param.kind();
        if matches!(kind, ParamKind::Class(_)) {
            continue;
        }
        let default = match &param.default {
            Some(v) if !is_associative(v) => Some(DefaultValue::from(v.clone())),
            _ if kind == ParamKind::Array => Some(DefaultValue::empty_list()),
            _ => None,
        };
        arguments.add(param.name.clone(), default, None);
    }

    Classified {
        arguments,
        options,
        options_bag,
    }
}
