//! Declared class and method shapes, standing in for run-time reflection.
//!
//! Commands declare their parameters explicitly, either through the
//! builder API or a JSON manifest:
//!
//! ```json
//! {
//!   "classes": {
//!     "Example\\CoolCommands": {
//!       "file": "CoolCommands.php",
//!       "methods": {
//!         "myCoolCommand": {
//!           "doc": "/**\n * Does something cool.\n */",
//!           "parameters": [
//!             { "name": "options", "type": "array", "default": { "silent|s": false } }
//!           ]
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Each class names the file it was declared in; that file's modification
//! time decides whether cached descriptors are still usable.

use crate::defaults::present;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::debug;

/// Type names that are plain values rather than injected collaborators.
const SCALAR_TYPES: &[&str] = &[
    "string", "int", "integer", "float", "double", "bool", "boolean", "mixed", "callable",
    "iterable", "null", "number",
];

/// What a parameter's declared type says about the value it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Untyped,
    Scalar(String),
    Array,
    /// A class type; such parameters are injected, never read from the command line.
    Class(String),
}

/// One declared method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// `None` when the parameter has no default; `Some(Null)` for an explicit null.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            default: None,
        }
    }

    pub fn typed(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn kind(&self) -> ParamKind {
        let Some(ref t) = self.type_name else {
            return ParamKind::Untyped;
        };
        let t = t.trim_start_matches('?');
        let lower = t.to_ascii_lowercase();
        if lower == "array" {
            ParamKind::Array
        } else if SCALAR_TYPES.contains(&lower.as_str()) {
            ParamKind::Scalar(lower)
        } else {
            ParamKind::Class(t.to_string())
        }
    }
}

/// Everything reflection yields for one method.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedMethod {
    pub class: String,
    pub name: String,
    pub doc_comment: Option<String>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

/// Source of class and method metadata.
pub trait Reflector {
    /// Reflect one method. Unknown classes or methods are errors.
    fn reflect(&self, class: &str, method: &str) -> Result<ReflectedMethod>;

    /// Method names of `class`, in declaration order.
    fn methods(&self, class: &str) -> Result<Vec<String>>;

    /// Every known class, in declaration order.
    fn classes(&self) -> Vec<String>;

    /// File that declares `class`, when there is one.
    fn source_file(&self, class: &str) -> Option<PathBuf>;

    /// Modification time (seconds since the epoch) of the declaring file.
    fn source_mtime(&self, class: &str) -> Option<u64> {
        let path = self.source_file(class)?;
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        modified.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
    }
}

/// Declared shape of one method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl MethodDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }
}

/// Declared shape of one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodDecl>,
}

impl ClassDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn method(mut self, name: impl Into<String>, decl: MethodDecl) -> Self {
        self.methods.insert(name.into(), decl);
        self
    }
}

/// In-memory class registry; the concrete [`Reflector`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassIndex {
    #[serde(default)]
    classes: IndexMap<String, ClassDecl>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, name: impl Into<String>, decl: ClassDecl) -> Self {
        self.insert(name, decl);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, decl: ClassDecl) {
        self.classes.insert(name.into(), decl);
    }

    /// Parse a manifest; relative `file` entries resolve against `base`.
    pub fn from_json(text: &str, base: Option<&Path>) -> serde_json::Result<Self> {
        let mut index: ClassIndex = serde_json::from_str(text)?;
        if let Some(base) = base {
            for decl in index.classes.values_mut() {
                if let Some(file) = decl.file.take() {
                    decl.file = Some(if file.is_relative() { base.join(file) } else { file });
                }
            }
        }
        Ok(index)
    }

    /// Load a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let index = Self::from_json(&text, path.parent()).map_err(|source| Error::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(manifest = %path.display(), classes = index.classes.len(), "loaded manifest");
        Ok(index)
    }

    fn class(&self, class: &str) -> Result<&ClassDecl> {
        self.classes
            .get(class)
            .ok_or_else(|| Error::UnknownClass(class.to_string()))
    }
}

impl Reflector for ClassIndex {
    fn reflect(&self, class: &str, method: &str) -> Result<ReflectedMethod> {
        let decl = self.class(class)?.methods.get(method).ok_or_else(|| Error::UnknownMethod {
            class: class.to_string(),
            method: method.to_string(),
        })?;
        Ok(ReflectedMethod {
            class: class.to_string(),
            name: method.to_string(),
            doc_comment: decl.doc.clone(),
            parameters: decl.parameters.clone(),
            return_type: decl.return_type.clone(),
        })
    }

    fn methods(&self, class: &str) -> Result<Vec<String>> {
        Ok(self.class(class)?.methods.keys().cloned().collect())
    }

    fn classes(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    fn source_file(&self, class: &str) -> Option<PathBuf> {
        self.classes.get(class).and_then(|c| c.file.clone())
    }
}
