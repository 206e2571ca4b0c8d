//! Text-level building blocks for command metadata.
//!
//! Nothing in here knows about descriptors or caches: it turns raw
//! documentation comments into prose and `@tag` pairs, and converts
//! method names and list-valued tag bodies into their normalized forms.

pub mod docblock;
pub mod naming;

pub use docblock::{Docblock, Tag};
pub use naming::{convert_name, split_list, split_option_key, strip_sigils};
