//! Command names, alias lists and option keys.

use regex::Regex;
use std::sync::LazyLock;

static RE_LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[[:space:],]+").unwrap());

/// Convert a camelCase method name into a command name.
///
/// `fooBar` → `foo:bar`, `fooBarBazBoz` → `foo:bar-baz-boz`,
/// `getHTTPStatus` → `get:http-status`, `status` → `status`.
pub fn convert_name(method: &str) -> String {
    let chars: Vec<char> = method.chars().collect();
    let mut dashed = String::with_capacity(method.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // Boundary after a lowercase/digit, or at the end of an acronym run
            if !prev.is_uppercase() || next_is_lower {
                dashed.push('-');
            }
        }
        dashed.extend(c.to_lowercase());
    }

    dashed.replacen('-', ":", 1)
}

/// Split a list-valued tag body (`@aliases`, `@topics`).
///
/// `"a b c"`, `"a, b, c"` and `"a,b,c"` all yield `["a", "b", "c"]`.
/// Empty entries are dropped and duplicates keep their first position.
pub fn split_list(body: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in RE_LIST_SEPARATOR.split(body.trim()) {
        if !item.is_empty() && !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// Split a combined option key: `"silent|s"` → `("silent", Some("s"))`.
pub fn split_option_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('|') {
        Some((long, short)) if !short.is_empty() => (long, Some(short)),
        Some((long, _)) => (long, None),
        None => (key, None),
    }
}

/// Strip the `$`, `--` or `-` a docblock may put in front of a parameter name.
pub fn strip_sigils(name: &str) -> &str {
    let name = name.strip_prefix('$').unwrap_or(name);
    name.strip_prefix("--")
        .or_else(|| name.strip_prefix('-'))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_two_words() {
        assert_eq!(convert_name("fooBar"), "foo:bar");
    }

    #[test]
    fn converts_many_words() {
        assert_eq!(convert_name("fooBarBazBoz"), "foo:bar-baz-boz");
        assert_eq!(convert_name("myCoolCommand"), "my:cool-command");
    }

    #[test]
    fn single_word_has_no_colon() {
        assert_eq!(convert_name("status"), "status");
    }

    #[test]
    fn acronym_runs_stay_together() {
        assert_eq!(convert_name("getHTTPStatus"), "get:http-status");
        assert_eq!(convert_name("exportJSON"), "export:json");
    }

    #[test]
    fn leading_capital() {
        assert_eq!(convert_name("FooBar"), "foo:bar");
    }

    #[test]
    fn digits_before_capital() {
        assert_eq!(convert_name("migrateD8Config"), "migrate:d8-config");
    }

    #[test]
    fn alias_forms_normalize() {
        let expected = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(split_list("a b c"), expected);
        assert_eq!(split_list("a, b, c"), expected);
        assert_eq!(split_list("a,b,c"), expected);
    }

    #[test]
    fn alias_list_dedups_and_drops_empties() {
        assert_eq!(split_list(" a,,b  a ,c, "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn splits_option_keys() {
        assert_eq!(split_option_key("silent|s"), ("silent", Some("s")));
        assert_eq!(split_option_key("silent"), ("silent", None));
        assert_eq!(split_option_key("silent|"), ("silent", None));
    }

    #[test]
    fn strips_sigils() {
        assert_eq!(strip_sigils("$name"), "name");
        assert_eq!(strip_sigils("--silent"), "silent");
        assert_eq!(strip_sigils("-s"), "s");
        assert_eq!(strip_sigils("plain"), "plain");
    }
}
