//! JSON renderer emitting the cache-record shape, for tooling.

use crate::cache::CacheRecord;
use crate::render::Renderer;
use anyhow::Result;
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct Output<'a> {
    commands: &'a [CacheRecord],
}

impl Renderer for JsonRenderer {
    fn render(&self, commands: &[CacheRecord]) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&Output { commands })?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
