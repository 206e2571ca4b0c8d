//! Docblock splitter: comment decoration, prose and `@tag` bodies.
//!
//! A docblock looks like:
//!
//! ```text
//! /**
//!  * Summary line that may wrap
//!  * onto a second line.
//!  *
//!  * Longer help text.
//!  *
//!  * @usage foo:bar --baz
//!  *   Explanation of the usage.
//!  */
//! ```
//!
//! Everything before the first line starting with `@identifier` is prose;
//! each tag body runs until the next tag line or the end of the comment.

use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z_][A-Za-z0-9_:.\-]*)(?:[[:blank:]]+(.*))?$").unwrap());

/// One `@name body` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// Body text with continuation lines joined by `\n`, trimmed.
    pub body: String,
}

/// A decoration-free docblock split into its prose and tags regions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Docblock {
    /// Prose lines before the first tag, individually trimmed.
    pub prose: Vec<String>,
    pub tags: Vec<Tag>,
}

impl Docblock {
    /// Parse a raw documentation comment.
    pub fn parse(raw: &str) -> Self {
        let mut doc = Docblock::default();
        let mut current: Option<(String, Vec<String>)> = None;

        for line in strip_decoration(raw) {
            if let Some(caps) = RE_TAG.captures(&line) {
                if let Some(tag) = current.take() {
                    doc.tags.push(finish_tag(tag));
                }
                let first = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
                current = Some((caps[1].to_string(), vec![first]));
                continue;
            }
            match current {
                Some((_, ref mut body)) => body.push(line),
                None => doc.prose.push(line),
            }
        }
        if let Some(tag) = current.take() {
            doc.tags.push(finish_tag(tag));
        }

        doc
    }

    /// Split the prose into `(description, help)`.
    ///
    /// The first paragraph (up to the first blank line) is the description,
    /// with its lines joined by single spaces. Every later paragraph is help.
    pub fn summary(&self) -> (String, String) {
        let mut lines = self.prose.iter().skip_while(|l| l.is_empty()).peekable();

        let mut description = Vec::new();
        while let Some(line) = lines.next_if(|l| !l.is_empty()) {
            description.push(line.as_str());
        }

        let help = lines.map(String::as_str).collect::<Vec<_>>().join("\n");
        (description.join(" "), help.trim().to_string())
    }
}

fn finish_tag((name, lines): (String, Vec<String>)) -> Tag {
    Tag {
        name,
        body: lines.join("\n").trim().to_string(),
    }
}

/// Remove `/**`, `*/` and leading `*` decoration, trimming each line.
pub fn strip_decoration(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in raw.lines() {
        let mut s = line.trim();
        if let Some(rest) = s.strip_prefix("/**") {
            s = rest;
        } else if let Some(rest) = s.strip_prefix("/*") {
            s = rest;
        }
        if let Some(rest) = s.strip_suffix("*/") {
            s = rest;
        }
        let s = s.trim_start();
        let s = s.strip_prefix('*').unwrap_or(s);
        out.push(s.trim().to_string());
    }

    // Opening and closing delimiters leave blank edges behind
    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOL: &str = "/**
     * Does something cool.
     *
     * @usage my:cool-command --silent
     *   Runs quietly.
     */";

    #[test]
    fn strips_decoration() {
        let lines = strip_decoration(COOL);
        assert_eq!(lines[0], "Does something cool.");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "@usage my:cool-command --silent");
        assert_eq!(lines[3], "Runs quietly.");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn single_line_comment() {
        assert_eq!(strip_decoration("/** Just this. */"), vec!["Just this."]);
    }

    #[test]
    fn splits_prose_and_tags() {
        let doc = Docblock::parse(COOL);
        assert_eq!(doc.prose, vec!["Does something cool.", ""]);
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.tags[0].name, "usage");
        assert_eq!(doc.tags[0].body, "my:cool-command --silent\nRuns quietly.");
    }

    #[test]
    fn multi_line_tag_bodies() {
        let doc = Docblock::parse(
            "/**\n * @option silent Be quiet\n *   and stay quiet.\n * @aliases a b\n */",
        );
        assert_eq!(doc.tags[0].body, "silent Be quiet\nand stay quiet.");
        assert_eq!(doc.tags[1].name, "aliases");
        assert_eq!(doc.tags[1].body, "a b");
    }

    #[test]
    fn bare_tag_has_empty_body() {
        let doc = Docblock::parse("/**\n * Summary.\n * @hidden\n */");
        assert_eq!(doc.tags[0], Tag { name: "hidden".into(), body: String::new() });
    }

    #[test]
    fn at_sign_mid_line_is_prose() {
        let doc = Docblock::parse("/**\n * Mail me at someone@example.com\n */");
        assert!(doc.tags.is_empty());
        assert_eq!(doc.prose.len(), 1);
    }

    #[test]
    fn summary_takes_first_paragraph() {
        let doc = Docblock::parse(
            "/**\n * First line\n * continues here.\n *\n * Help one.\n * Help two.\n *\n * Help three.\n */",
        );
        let (description, help) = doc.summary();
        assert_eq!(description, "First line continues here.");
        assert_eq!(help, "Help one.\nHelp two.\n\nHelp three.");
    }

    #[test]
    fn summary_without_help() {
        let (description, help) = Docblock::parse(COOL).summary();
        assert_eq!(description, "Does something cool.");
        assert_eq!(help, "");
    }

    #[test]
    fn empty_comment() {
        let doc = Docblock::parse("/** */");
        assert!(doc.prose.is_empty());
        assert!(doc.tags.is_empty());
        assert_eq!(doc.summary(), (String::new(), String::new()));
    }
}
