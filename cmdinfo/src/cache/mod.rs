//! Cache records: a descriptor snapshot plus what is needed to trust it.

mod store;

pub use store::{CacheStore, FileCache, MemoryCache};

use crate::annotations::AnnotationBag;
use crate::defaults::DefaultsWithDescriptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Version of the record shape. Records carrying any other value are stale.
pub const CACHE_SCHEMA_VERSION: u32 = 4;

/// Whether a record may populate a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Fresh,
    Stale,
}

/// Flat, serializable descriptor snapshot.
///
/// Every field except `return_type` is required; a record missing one does
/// not deserialize and is treated as a cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub schema: u32,
    pub class: String,
    pub method_name: String,
    /// Declaring file mtime (seconds); 0 when the class has no source file.
    pub mtime: u64,
    pub name: String,
    pub description: String,
    pub help: String,
    pub aliases: Vec<String>,
    pub arguments: DefaultsWithDescriptions,
    pub options: DefaultsWithDescriptions,
    pub example_usages: IndexMap<String, String>,
    pub annotations: AnnotationBag,
    #[serde(default)]
    pub return_type: Option<String>,
}

impl CacheRecord {
    /// Fresh only when the schema matches exactly and `current_mtime` equals
    /// the recorded one.
    pub fn state(&self, current_mtime: u64) -> CacheState {
        if self.schema != CACHE_SCHEMA_VERSION || self.mtime != current_mtime {
            CacheState::Stale
        } else {
            CacheState::Fresh
        }
    }

    pub fn key(&self) -> String {
        cache_key(&self.class, &self.method_name)
    }

    /// `None` for anything that is not a complete record.
    pub fn from_json(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Store key for one method.
pub fn cache_key(class: &str, method: &str) -> String {
    format!("{class}::{method}")
}
