//! Command descriptors from annotated method docblocks.
//!
//! A [`CommandDescriptor`] is built from a declared method (see
//! [`reflect`]): its parameters become positional arguments and options,
//! and its docblock supplies the name, description, help, aliases, usage
//! examples and any other `@tag` annotations. Descriptors snapshot into
//! [`CacheRecord`]s that stay valid until the declaring file changes or
//! [`CACHE_SCHEMA_VERSION`] moves.
//!
//! ```
//! use cmdinfo::reflect::{ClassDecl, ClassIndex, MethodDecl, Parameter};
//! use cmdinfo::CommandDescriptor;
//! use serde_json::json;
//!
//! let index = ClassIndex::new().with_class(
//!     "Example\\CoolCommands",
//!     ClassDecl::new().method(
//!         "myCoolCommand",
//!         MethodDecl::new()
//!             .doc("/**\n * Does something cool.\n */")
//!             .param(Parameter::new("options").with_default(json!({ "silent|s": false }))),
//!     ),
//! );
//! let mut cmd = CommandDescriptor::create(&index, "Example\\CoolCommands", "myCoolCommand")?;
//! assert_eq!(cmd.name(), "my:cool-command");
//! assert_eq!(cmd.description(), "Does something cool.");
//! # Ok::<(), cmdinfo::Error>(())
//! ```

pub mod annotations;
pub mod cache;
pub mod catalog;
pub mod defaults;
pub mod error;
pub mod input;
pub mod model;
pub mod parser;
pub mod reflect;
pub mod render;

pub use annotations::{AnnotationBag, AnnotationValue};
pub use cache::{CacheRecord, CacheState, CacheStore, FileCache, MemoryCache, CACHE_SCHEMA_VERSION};
pub use catalog::Catalog;
pub use defaults::{DefaultValue, DefaultsWithDescriptions, Entry};
pub use error::{Error, Result};
pub use input::{ArgumentMode, InputMode, OptionSpec};
pub use model::CommandDescriptor;
pub use parser::TagKind;
pub use reflect::{ClassIndex, Parameter, Reflector};
