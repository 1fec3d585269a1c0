//! Identifier generation and reference-name lookup.

use std::collections::{HashMap, HashSet};

/// Derive an HTML identifier from a title or target name.
///
/// Lowercases, joins runs of ASCII alphanumerics with single hyphens, and
/// drops anything before the first letter so the result is a valid id.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(make_id("Short Features"), "short-features");
/// assert_eq!(make_id("2. Getting *Started*!"), "getting-started");
/// assert_eq!(make_id("42"), "section");
/// ```
pub(crate) fn make_id(text: &str) -> String {
    let slug = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let id = slug.trim_start_matches(|c: char| !c.is_ascii_alphabetic());
    if id.is_empty() {
        "section".to_string()
    } else {
        id.to_string()
    }
}

/// Normalize a reference name: lowercase with whitespace runs collapsed.
pub(crate) fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Hands out identifiers that are unique within one document.
#[derive(Debug, Default)]
pub(crate) struct IdRegistry {
    used: HashSet<String>,
}

impl IdRegistry {
    /// Claim `base`, or `base-1`, `base-2`, ... if it is taken.
    pub fn claim(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Reference names mapped to the `href` they resolve to.
#[derive(Debug, Default)]
pub(crate) struct Targets {
    hrefs: HashMap<String, String>,
}

impl Targets {
    /// Register a name; the first registration of a name wins.
    pub fn insert(&mut self, name: &str, href: String) {
        self.hrefs.entry(normalize_name(name)).or_insert(href);
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.hrefs.get(&normalize_name(name)).map(String::as_str)
    }
}
