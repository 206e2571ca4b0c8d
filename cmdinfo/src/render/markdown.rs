//! GitHub-flavored markdown renderer.

use crate::cache::CacheRecord;
use crate::input::{argument_synopsis, ArgumentMode, OptionSpec};
use crate::render::Renderer;
use anyhow::Result;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, commands: &[CacheRecord]) -> Result<String> {
        let mut output = String::new();

        if !commands.is_empty() {
            output.push_str("## Index\n\n");
            for cmd in commands {
                output.push_str(&format!("* [{}](#{})\n", cmd.name, github_slug(&cmd.name)));
            }
            output.push('\n');
        }

        for cmd in commands {
            output.push_str(&render_command(cmd));
            output.push('\n');
        }

        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_command(cmd: &CacheRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {}\n", cmd.name));
    if !cmd.description.is_empty() {
        lines.push(format!("{}\n", cmd.description));
    }

    lines.push("#### Usage\n".to_string());
    lines.push(format!("```\n{}\n```\n", synopsis(cmd)));

    if !cmd.aliases.is_empty() {
        lines.push("#### Aliases\n".to_string());
        for alias in &cmd.aliases {
            lines.push(format!("* `{}`", alias));
        }
        lines.push(String::new());
    }

    if !cmd.arguments.is_empty() {
        lines.push("#### Arguments\n".to_string());
        for (name, entry) in cmd.arguments.iter() {
            let mode = ArgumentMode::classify(entry.default.as_ref());
            let mut line = format!("* `{}`", argument_synopsis(name, &mode));
            if let Some(ref desc) = entry.description {
                line.push_str(&format!(" {}", desc));
            }
            if let ArgumentMode::Optional(ref v) = mode {
                if !v.is_null() {
                    line.push_str(&format!(" (default: `{}`)", v));
                }
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    if !cmd.options.is_empty() {
        lines.push("#### Options\n".to_string());
        for (key, entry) in cmd.options.iter() {
            let spec = OptionSpec::from_entry(key, entry);
            let mut line = format!("* `{}`", spec.synopsis());
            if let Some(ref desc) = spec.description {
                line.push_str(&format!(" {}", desc));
            }
            if let Some(default) = spec.shown_default() {
                line.push_str(&format!(" (default: `{}`)", default));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    if !cmd.example_usages.is_empty() {
        lines.push("#### Examples\n".to_string());
        for (usage, explanation) in &cmd.example_usages {
            if explanation.is_empty() {
                lines.push(format!("* `{}`", usage));
            } else {
                lines.push(format!("* `{}` {}", usage, explanation));
            }
        }
        lines.push(String::new());
    }

    if !cmd.help.is_empty() {
        lines.push(format!("{}\n", cmd.help));
    }

    lines.join("\n")
}

/// `name [options] [--] <arg> [<opt>]`
fn synopsis(cmd: &CacheRecord) -> String {
    let mut out = cmd.name.clone();
    if !cmd.options.is_empty() {
        out.push_str(" [options]");
    }
    if !cmd.arguments.is_empty() {
        out.push_str(" [--]");
        for (name, entry) in cmd.arguments.iter() {
            let mode = ArgumentMode::classify(entry.default.as_ref());
            out.push(' ');
            out.push_str(&argument_synopsis(name, &mode));
        }
    }
    out
}

/// GitHub heading anchor: lowercase, keep alphanumerics, spaces and
/// hyphens, spaces become hyphens. `my:cool-command` → `mycool-command`.
fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}
