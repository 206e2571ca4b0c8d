//! Where cache records live between runs.

use super::CacheRecord;
use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key-value store for cache records.
pub trait CacheStore {
    /// A stored record, or `None` on miss or unreadable entry.
    fn get(&self, key: &str) -> Option<CacheRecord>;
    fn set(&mut self, key: &str, record: &CacheRecord) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, CacheRecord>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheRecord> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, record: &CacheRecord) -> Result<()> {
        self.entries.insert(key.to_string(), record.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// One pretty-printed JSON file per record.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<CacheRecord> {
        let path = self.path_for(key);
        let text = fs::read_to_string(&path).ok()?;
        let record = CacheRecord::from_json(&text);
        if record.is_none() {
            warn!(path = %path.display(), "ignoring unreadable cache entry");
        }
        record
    }

    fn set(&mut self, key: &str, record: &CacheRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, record.to_json()?)?;
        debug!(path = %path.display(), "wrote cache entry");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

/// Percent-encode every byte outside `[A-Za-z0-9.-]`, so distinct keys never
/// share a file: `Example\Cool::myCommand` → `Example%5CCool%3A%3AmyCommand`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationBag;
    use crate::cache::CACHE_SCHEMA_VERSION;
    use crate::defaults::DefaultsWithDescriptions;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn record() -> CacheRecord {
        CacheRecord {
            schema: CACHE_SCHEMA_VERSION,
            class: "Example\\Cool".into(),
            method_name: "myCommand".into(),
            mtime: 0,
            name: "my:command".into(),
            description: String::new(),
            help: String::new(),
            aliases: Vec::new(),
            arguments: DefaultsWithDescriptions::new(),
            options: DefaultsWithDescriptions::new(),
            example_usages: IndexMap::new(),
            annotations: AnnotationBag::new(),
            return_type: None,
        }
    }

    #[test]
    fn encodes_keys_as_file_names() {
        assert_eq!(encode_key("Example\\Cool::myCommand"), "Example%5CCool%3A%3AmyCommand");
        assert_eq!(encode_key("Legacy_Cool::run"), "Legacy%5FCool%3A%3Arun");
        assert_eq!(encode_key("100%::x"), "100%25%3A%3Ax");
    }

    #[test]
    fn namespaced_and_underscored_classes_keep_separate_entries() {
        let dir = TempDir::new().unwrap();
        let mut cache = FileCache::new(dir.path());
        let namespaced = CacheRecord {
            class: "A\\B".into(),
            method_name: "c".into(),
            ..record()
        };
        let underscored = CacheRecord {
            class: "A_B".into(),
            method_name: "c".into(),
            ..record()
        };
        cache.set(&namespaced.key(), &namespaced).unwrap();
        cache.set(&underscored.key(), &underscored).unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
        assert_eq!(cache.get("A\\B::c"), Some(namespaced));
        assert_eq!(cache.get("A_B::c"), Some(underscored));
    }

    #[test]
    fn memory_cache_round_trip() {
        let mut cache = MemoryCache::new();
        assert!(cache.get("k").is_none());
        cache.set("k", &record()).unwrap();
        assert_eq!(cache.get("k"), Some(record()));
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn file_cache_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let key = record().key();

        let mut cache = FileCache::new(dir.path().join("cache"));
        cache.set(&key, &record()).unwrap();

        let again = FileCache::new(dir.path().join("cache"));
        assert_eq!(again.get(&key), Some(record()));
        assert!(dir.path().join("cache/Example%5CCool%3A%3AmyCommand.json").is_file());
    }

    #[test]
    fn file_cache_treats_garbage_as_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        fs::write(dir.path().join("Foo%3A%3Abar.json"), "{ truncated").unwrap();
        assert!(cache.get("Foo::bar").is_none());
    }

    #[test]
    fn file_cache_clear_removes_directory() {
        let dir = TempDir::new().unwrap();
        let mut cache = FileCache::new(dir.path().join("cache"));
        cache.set("Foo::bar", &record()).unwrap();
        cache.clear().unwrap();
        assert!(!cache.dir().exists());
        // Clearing twice is fine
        cache.clear().unwrap();
    }
}
