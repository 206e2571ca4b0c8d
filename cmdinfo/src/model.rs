//! The command descriptor and its two-phase lifecycle.
//!
//! A descriptor is built either fresh from reflection (parameters classified
//! right away, docblock parsed on first use) or from a fresh cache record
//! (already parsed). Docblock-dependent accessors take `&mut self` and go
//! through [`CommandDescriptor::ensure_parsed`].

use crate::annotations::{AnnotationBag, AnnotationValue};
use crate::cache::{CacheRecord, CacheState, CACHE_SCHEMA_VERSION};
use crate::defaults::{DefaultValue, DefaultsWithDescriptions};
use crate::error::Result;
use crate::parser;
use crate::reflect::{ReflectedMethod, Reflector};
use cmdinfo_syntax::{convert_name, split_list};
use indexmap::IndexMap;
use tracing::debug;

/// Parse state of the docblock.
#[derive(Debug, Clone, PartialEq)]
enum DocState {
    Unparsed { doc_comment: Option<String> },
    Parsed,
}

/// Normalized description of one command method.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    class: String,
    method_name: String,
    mtime: u64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) help: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) arguments: DefaultsWithDescriptions,
    pub(crate) options: DefaultsWithDescriptions,
    pub(crate) example_usages: IndexMap<String, String>,
    pub(crate) annotations: AnnotationBag,
    pub(crate) return_type: Option<String>,
    /// Name of the trailing options-bag parameter, if the method has one.
    pub(crate) options_bag: Option<String>,
    doc: DocState,
    #[cfg(test)]
    parses: usize,
}

impl CommandDescriptor {
    /// Build fresh from reflection. The docblock is parsed on first use.
    pub fn create<R: Reflector + ?Sized>(reflector: &R, class: &str, method: &str) -> Result<Self> {
        let reflected = reflector.reflect(class, method)?;
        let mtime = reflector.source_mtime(class).unwrap_or(0);
        Ok(Self::from_reflection(reflected, mtime))
    }

    /// Rebuild from a cache record, falling back to reflection when stale.
    pub fn deserialize<R: Reflector + ?Sized>(reflector: &R, record: CacheRecord) -> Result<Self> {
        let class = record.class.clone();
        let method = record.method_name.clone();
        Self::from_cache_or_create(reflector, &class, &method, Some(record))
    }

    /// Use `cached` when it is fresh for this method, otherwise build fresh.
    pub fn from_cache_or_create<R: Reflector + ?Sized>(
        reflector: &R,
        class: &str,
        method: &str,
        cached: Option<CacheRecord>,
    ) -> Result<Self> {
        if let Some(record) = cached {
            let mtime = reflector.source_mtime(class).unwrap_or(0);
            let same_method = record.class == class && record.method_name == method;
            match record.state(mtime) {
                CacheState::Fresh if same_method => {
                    debug!(class, method, "using cached descriptor");
                    return Ok(Self::from_record(record));
                }
                _ => debug!(class, method, schema = record.schema, "discarding stale cache record"),
            }
        }
        Self::create(reflector, class, method)
    }

    fn from_reflection(reflected: ReflectedMethod, mtime: u64) -> Self {
        let classified = parser::params::classify(&reflected.parameters);
        Self {
            name: convert_name(&reflected.name),
            class: reflected.class,
            method_name: reflected.name,
            mtime,
            description: String::new(),
            help: String::new(),
            aliases: Vec::new(),
            arguments: classified.arguments,
            options: classified.options,
            example_usages: IndexMap::new(),
            annotations: AnnotationBag::new(),
            return_type: reflected.return_type,
            options_bag: classified.options_bag,
            doc: DocState::Unparsed {
                doc_comment: reflected.doc_comment,
            },
            #[cfg(test)]
            parses: 0,
        }
    }

    fn from_record(record: CacheRecord) -> Self {
        Self {
            class: record.class,
            method_name: record.method_name,
            mtime: record.mtime,
            name: record.name,
            description: record.description,
            help: record.help,
            aliases: record.aliases,
            arguments: record.arguments,
            options: record.options,
            example_usages: record.example_usages,
            annotations: record.annotations,
            return_type: record.return_type,
            options_bag: None,
            doc: DocState::Parsed,
            #[cfg(test)]
            parses: 0,
        }
    }

    /// Parse the docblock if that has not happened yet.
    pub fn ensure_parsed(&mut self) {
        if let DocState::Unparsed { doc_comment } = std::mem::replace(&mut self.doc, DocState::Parsed) {
            if let Some(raw) = doc_comment {
                parser::apply_docblock(self, &raw);
            }
            #[cfg(test)]
            {
                self.parses += 1;
            }
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.doc == DocState::Parsed
    }

    /// Snapshot for the cache store.
    pub fn serialize(&mut self) -> CacheRecord {
        self.ensure_parsed();
        CacheRecord {
            schema: CACHE_SCHEMA_VERSION,
            class: self.class.clone(),
            method_name: self.method_name.clone(),
            mtime: self.mtime,
            name: self.name.clone(),
            description: self.description.clone(),
            help: self.help.clone(),
            aliases: self.aliases.clone(),
            arguments: self.arguments.clone(),
            options: self.options.clone(),
            example_usages: self.example_usages.clone(),
            annotations: self.annotations.clone(),
            return_type: self.return_type.clone(),
        }
    }

    // -- identity -------------------------------------------------------------

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Declaring file mtime recorded when this descriptor was built.
    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    // -- docblock-derived accessors ------------------------------------------

    pub fn name(&mut self) -> &str {
        self.ensure_parsed();
        &self.name
    }

    pub fn valid(&mut self) -> bool {
        !self.name().is_empty()
    }

    /// Clear the name so the method is cached as "known, not a command".
    pub fn invalidate(&mut self) {
        self.ensure_parsed();
        self.name.clear();
    }

    pub fn description(&mut self) -> &str {
        self.ensure_parsed();
        &self.description
    }

    pub fn help(&mut self) -> &str {
        self.ensure_parsed();
        &self.help
    }

    pub fn aliases(&mut self) -> &[String] {
        self.ensure_parsed();
        &self.aliases
    }

    pub fn arguments(&mut self) -> &DefaultsWithDescriptions {
        self.ensure_parsed();
        &self.arguments
    }

    pub fn options(&mut self) -> &DefaultsWithDescriptions {
        self.ensure_parsed();
        &self.options
    }

    pub fn example_usages(&mut self) -> &IndexMap<String, String> {
        self.ensure_parsed();
        &self.example_usages
    }

    pub fn raw_annotations(&mut self) -> &AnnotationBag {
        self.ensure_parsed();
        &self.annotations
    }

    pub fn return_type(&mut self) -> Option<&str> {
        self.ensure_parsed();
        self.return_type.as_deref()
    }

    pub fn has_annotation(&mut self, name: &str) -> bool {
        self.ensure_parsed();
        self.annotations.has(name)
    }

    pub fn annotation(&mut self, name: &str) -> Option<&AnnotationValue> {
        self.ensure_parsed();
        self.annotations.get(name)
    }

    pub fn annotation_list(&mut self, name: &str) -> Vec<&str> {
        self.ensure_parsed();
        self.annotations.get_list(name)
    }

    pub fn hidden(&mut self) -> bool {
        self.has_annotation("hidden")
    }

    /// `@topics` entries, split like aliases.
    pub fn topics(&mut self) -> Vec<String> {
        let joined = self.annotation_list("topics").join(",");
        split_list(&joined)
    }

    /// `(argument, description)` pairs in positional order.
    pub fn parameter_map(&mut self) -> Vec<(String, String)> {
        self.arguments()
            .iter()
            .map(|(name, e)| (name.to_string(), e.description.clone().unwrap_or_default()))
            .collect()
    }

    // -- setters ------------------------------------------------------------
    //
    // Setters parse first so a later lazy parse never overwrites them.

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.ensure_parsed();
        self.name = name.into();
    }

    /// Newlines are collapsed so the description stays on one line.
    pub fn set_description(&mut self, description: &str) {
        self.ensure_parsed();
        self.description = collapse_lines(description);
    }

    pub fn set_help(&mut self, help: impl Into<String>) {
        self.ensure_parsed();
        self.help = help.into();
    }

    /// Replace the aliases; empties are dropped and duplicates removed.
    pub fn set_aliases<I, S>(&mut self, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_parsed();
        self.aliases.clear();
        for alias in aliases {
            push_alias(&mut self.aliases, alias.into());
        }
    }

    pub fn add_aliases(&mut self, body: &str) {
        self.ensure_parsed();
        for alias in split_list(body) {
            push_alias(&mut self.aliases, alias);
        }
    }

    pub fn set_return_type(&mut self, return_type: Option<String>) {
        self.ensure_parsed();
        self.return_type = return_type;
    }

    /// Record an example; a repeated usage replaces its explanation.
    pub fn add_example_usage(&mut self, usage: impl Into<String>, explanation: impl Into<String>) {
        self.ensure_parsed();
        self.example_usages.insert(usage.into(), explanation.into());
    }

    pub fn add_annotation(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.ensure_parsed();
        self.annotations.add(name, value);
    }

    pub fn remove_annotation(&mut self, name: &str) -> Option<AnnotationValue> {
        self.ensure_parsed();
        self.annotations.remove(name)
    }

    pub fn replace_raw_annotations(&mut self, annotations: AnnotationBag) {
        self.ensure_parsed();
        self.annotations = annotations;
    }

    /// Attach a description to an existing argument. Returns false if unknown.
    pub fn add_argument_description(&mut self, name: &str, description: impl Into<String>) -> bool {
        self.ensure_parsed();
        self.arguments.set_description(name, description)
    }

    /// Add or update an option, reconciling `name` against existing keys.
    pub fn add_option(&mut self, name: &str, default: Option<DefaultValue>, description: Option<String>) {
        self.ensure_parsed();
        parser::merge_option(&mut self.options, name, default, description);
    }
}

pub(crate) fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn push_alias(aliases: &mut Vec<String>, alias: String) {
    let alias = alias.trim();
    if !alias.is_empty() && !aliases.iter().any(|a| a == alias) {
        aliases.push(alias.to_string());
    }
}
