//! Build command descriptors from class manifests and render them.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `cmdinfo < commands.json` renders to stdout
//! - **file mode**: `cmdinfo -o docs/commands manifests/*.json` writes one
//!   file per manifest

use anyhow::{Context, Result};
use clap::Parser;
use cmdinfo::render::{self, Renderer};
use cmdinfo::{CacheRecord, CacheStore, Catalog, ClassIndex, FileCache, MemoryCache, Reflector};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "cmdinfo",
    about = "Build command descriptors from annotated method manifests",
    after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging"
)]
struct Cli {
    /// Manifest files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Directory for cached descriptors. Without it nothing is persisted.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Treat every method as a command, not only those tagged @command
    #[arg(long)]
    all_methods: bool,

    /// Include @hidden commands in output
    #[arg(long)]
    show_hidden: bool,

    /// Only render these classes. Can be specified multiple times.
    #[arg(long)]
    class: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: read one manifest from stdin, render to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let index = ClassIndex::from_json(&input, None).context("failed to parse manifest from stdin")?;
    let renderer = render::create_renderer(&cli.format)?;
    let records = collect(&index, cli)?;
    print!("{}", renderer.render(&records)?);
    Ok(())
}

/// file mode: process each manifest, write one rendered file per manifest.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    let renderer = render::create_renderer(&cli.format)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for path in expand_globs(&cli.files)? {
        let index = match ClassIndex::load(&path) {
            Ok(index) => index,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let records = collect(&index, cli)?;
        // Skip manifests without a single command
        if records.is_empty() {
            debug!(manifest = %path.display(), "no commands");
            continue;
        }

        let out_path = output_dir.join(format!(
            "{}.{}",
            derive_output_name(&path),
            renderer.file_extension()
        ));
        write_rendered(renderer.as_ref(), &records, &out_path)?;
    }

    Ok(())
}

fn write_rendered(renderer: &dyn Renderer, records: &[CacheRecord], out_path: &Path) -> Result<()> {
    let output = renderer.render(records)?;
    fs::write(out_path, output).with_context(|| format!("failed to write {}", out_path.display()))
}

/// Build the commands of every selected class, going through the cache.
fn collect(index: &ClassIndex, cli: &Cli) -> Result<Vec<CacheRecord>> {
    match cli.cache_dir {
        Some(ref dir) => collect_with(index, cli, FileCache::new(dir)),
        None => collect_with(index, cli, MemoryCache::new()),
    }
}

fn collect_with<C: CacheStore>(index: &ClassIndex, cli: &Cli, cache: C) -> Result<Vec<CacheRecord>> {
    let mut catalog = Catalog::new(index, cache)
        .include_all_public_methods(cli.all_methods)
        .include_hidden(cli.show_hidden);

    let mut records = Vec::new();
    for class in index.classes() {
        if !cli.class.is_empty() && !cli.class.contains(&class) {
            continue;
        }
        let commands = catalog
            .commands_for_class(&class)
            .with_context(|| format!("failed to build commands for {}", class))?;
        records.extend(commands.into_iter().map(|mut cmd| cmd.serialize()));
    }
    Ok(records)
}

/// Expand glob patterns into a list of manifest paths.
/// Bare directories are scanned (non-recursively) for `.json` files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json") {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// "manifests/site.commands.json" → "site.commands"
fn derive_output_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "commands".to_string())
}
