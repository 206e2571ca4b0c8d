//! Docblock dispatch: applies parsed tags to a descriptor.

pub(crate) mod params;
mod value;

use crate::defaults::{DefaultValue, DefaultsWithDescriptions};
use crate::model::{collapse_lines, push_alias, CommandDescriptor};
use cmdinfo_syntax::{split_list, strip_sigils, Docblock, Tag};
use tracing::trace;

pub(crate) use value::interpret_default;

/// How a tag name is handled. Names outside the table are raw annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Name,
    Description,
    Help,
    Aliases,
    Usage,
    Option,
    Default,
    Param,
    Return,
    Raw,
}

impl TagKind {
    pub fn of(tag: &str) -> Self {
        match tag {
            "command" | "name" => TagKind::Name,
            "description" => TagKind::Description,
            "help" => TagKind::Help,
            "aliases" => TagKind::Aliases,
            "usage" => TagKind::Usage,
            "option" => TagKind::Option,
            "default" => TagKind::Default,
            "param" | "arg" | "field" => TagKind::Param,
            "return" => TagKind::Return,
            _ => TagKind::Raw,
        }
    }
}

/// Parse `raw` and fold the result into `desc`.
pub(crate) fn apply_docblock(desc: &mut CommandDescriptor, raw: &str) {
    let doc = Docblock::parse(raw);

    let (description, help) = doc.summary();
    if !description.is_empty() {
        desc.description = description;
    }
    if !help.is_empty() {
        desc.help = help;
    }

    for tag in &doc.tags {
        let kind = TagKind::of(&tag.name);
        trace!(tag = %tag.name, ?kind, "dispatching tag");
        apply_tag(desc, kind, tag);
    }
}

fn apply_tag(desc: &mut CommandDescriptor, kind: TagKind, tag: &Tag) {
    let body = tag.body.as_str();
    match kind {
        TagKind::Name => {
            if let Some(name) = body.split_whitespace().next() {
                desc.name = name.to_string();
            }
            // Kept under its own name; only `@command` marks an explicit command
            desc.annotations.add(tag.name.as_str(), body);
        }
        TagKind::Description => desc.description = collapse_lines(body),
        TagKind::Help => desc.help = body.to_string(),
        TagKind::Aliases => {
            for alias in split_list(body) {
                push_alias(&mut desc.aliases, alias);
            }
        }
        TagKind::Usage => {
            let (usage, explanation) = match body.split_once('\n') {
                Some((usage, rest)) => (usage.trim(), collapse_lines(rest)),
                None => (body, String::new()),
            };
            if !usage.is_empty() {
                desc.example_usages.insert(usage.to_string(), explanation);
            }
        }
        TagKind::Option => {
            let (name, text) = split_name(body);
            if name.is_empty() {
                desc.annotations.add(tag.name.as_str(), body);
                return;
            }
            merge_option(&mut desc.options, name, None, non_empty(text));
        }
        TagKind::Default => {
            let (name, text) = split_name(body);
            let value = DefaultValue::from(interpret_default(&text));
            if !apply_default(desc, name, value) {
                desc.annotations.add(tag.name.as_str(), body);
            }
        }
        TagKind::Param => {
            let (name, text) = split_param(body);
            if desc.options_bag.as_deref() == Some(name) {
                return;
            }
            if name.is_empty() || !desc.arguments.set_description(name, text.as_str()) {
                desc.annotations.add(tag.name.as_str(), body);
            }
        }
        TagKind::Return => {
            if desc.return_type.is_none() {
                desc.return_type = body.split_whitespace().next().map(str::to_string);
            }
        }
        TagKind::Raw => desc.annotations.add(tag.name.as_str(), body),
    }
}

/// Add or update an option under its reconciled name.
pub(crate) fn merge_option(
    options: &mut DefaultsWithDescriptions,
    name: &str,
    default: Option<DefaultValue>,
    description: Option<String>,
) {
    let key = options.approximate_name(name);
    let (default, description) = match options.get(&key) {
        Some(existing) => (
            default.or_else(|| existing.default.clone()),
            description.or_else(|| existing.description.clone()),
        ),
        None => (default, description),
    };
    options.add(key, default, description);
}

fn apply_default(desc: &mut CommandDescriptor, name: &str, value: DefaultValue) -> bool {
    if name.is_empty() {
        return false;
    }
    if desc.arguments.set_default(name, value.clone()) {
        return true;
    }
    let key = desc.options.approximate_name(name);
    desc.options.set_default(&key, value)
}

/// `"--name Some text"` → `("name", "Some text")`.
fn split_name(body: &str) -> (&str, String) {
    let mut parts = body.splitn(2, char::is_whitespace);
    let name = strip_sigils(parts.next().unwrap_or_default());
    let text = parts.next().map(collapse_lines).unwrap_or_default();
    (name, text)
}

/// `"string $name The name"` or `"$name The name"` or `"name The name"`.
fn split_param(body: &str) -> (&str, String) {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let at = match tokens.iter().take(2).position(|t| t.starts_with('$')) {
        Some(i) => i,
        None => 0,
    };
    let Some(raw_name) = tokens.get(at) else {
        return ("", String::new());
    };
    let name = strip_sigils(raw_name);
    (name, tokens[at + 1..].join(" "))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
