//! Trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::cache::CacheRecord;
use anyhow::{anyhow, Result};

/// Renders parsed command snapshots into one output format.
pub trait Renderer {
    fn render(&self, commands: &[CacheRecord]) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}
