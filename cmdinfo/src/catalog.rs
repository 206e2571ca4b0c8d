//! Turn every method of a class into descriptors, going through the cache.

use crate::cache::{cache_key, CacheStore};
use crate::error::Result;
use crate::model::CommandDescriptor;
use crate::reflect::Reflector;
use tracing::{debug, warn};

/// Builds command descriptors for whole classes.
///
/// Methods that are neither commands nor hooks are invalidated and still
/// cached, so later runs skip re-parsing them.
pub struct Catalog<'a, R: Reflector + ?Sized, C: CacheStore> {
    reflector: &'a R,
    cache: C,
    include_all_public_methods: bool,
    include_hidden: bool,
}

impl<'a, R: Reflector + ?Sized, C: CacheStore> Catalog<'a, R, C> {
    pub fn new(reflector: &'a R, cache: C) -> Self {
        Self {
            reflector,
            cache,
            include_all_public_methods: false,
            include_hidden: false,
        }
    }

    /// Treat every method as a command, not only those tagged `@command`.
    pub fn include_all_public_methods(mut self, yes: bool) -> Self {
        self.include_all_public_methods = yes;
        self
    }

    /// Keep `@hidden` commands in the result.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    pub fn into_cache(self) -> C {
        self.cache
    }

    /// Every method of `class`, valid or not, in declaration order.
    pub fn descriptors_for_class(&mut self, class: &str) -> Result<Vec<CommandDescriptor>> {
        let mut out = Vec::new();
        for method in self.reflector.methods(class)? {
            // Underscore-prefixed methods are internal, never commands
            if method.starts_with('_') {
                continue;
            }
            let key = cache_key(class, &method);
            let cached = self.cache.get(&key);
            let mut desc = CommandDescriptor::from_cache_or_create(self.reflector, class, &method, cached)?;

            if !desc.is_parsed() {
                if !self.is_command_or_hook(&mut desc) {
                    desc.invalidate();
                }
                if let Err(e) = self.cache.set(&key, &desc.serialize()) {
                    warn!(key = %key, error = %e, "failed to store cache record");
                }
            }
            out.push(desc);
        }
        Ok(out)
    }

    /// Commands of `class` that should be registered.
    pub fn commands_for_class(&mut self, class: &str) -> Result<Vec<CommandDescriptor>> {
        let include_hidden = self.include_hidden;
        let commands: Vec<_> = self
            .descriptors_for_class(class)?
            .into_iter()
            .filter_map(|mut d| {
                let keep = d.valid() && !d.has_annotation("hook") && (include_hidden || !d.hidden());
                keep.then_some(d)
            })
            .collect();
        debug!(class, commands = commands.len(), "collected commands");
        Ok(commands)
    }

    /// Commands of every class the reflector knows.
    pub fn commands(&mut self) -> Result<Vec<CommandDescriptor>> {
        let mut out = Vec::new();
        for class in self.reflector.classes() {
            out.extend(self.commands_for_class(&class)?);
        }
        Ok(out)
    }

    fn is_command_or_hook(&self, desc: &mut CommandDescriptor) -> bool {
        desc.has_annotation("hook") || self.include_all_public_methods || desc.has_annotation("command")
    }
}
