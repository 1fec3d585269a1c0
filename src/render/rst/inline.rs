//! Inline markup: emphasis, literals, interpreted text, and references.
//!
//! Recognition follows the reStructuredText rules for start- and
//! end-strings: a start-string must sit at the start of the text or after
//! whitespace or an opening punctuation mark and be followed by
//! non-whitespace; an end-string must follow non-whitespace and be followed
//! by whitespace, closing punctuation, or the end of the text.

use std::fmt::Write;

use crate::render::{RenderError, Reporter, Severity};
use crate::util::escape_html;

use super::ids::Targets;

/// One run of inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inline {
    Text(String),
    Emphasis(String),
    Strong(String),
    Literal(String),
    Cite(String),
    /// Hyperlink with its URI given inline.
    Link { text: String, uri: String },
    /// Reference to a named target, resolved at write time.
    Reference { text: String, name: String },
}

const OPENERS: &[char] = &['\'', '"', '(', '[', '{', '<', '-', '/', ':', '\u{2018}', '\u{201c}'];
const CLOSERS: &[char] = &[
    '\'', '"', ')', ']', '}', '>', '-', '/', ':', '.', ',', ';', '!', '?', '\\', '\u{2019}',
    '\u{201d}',
];
const URI_SCHEMES: &[&str] = &["https://", "http://", "mailto:"];

struct Scanner<'a> {
    chars: Vec<char>,
    line: usize,
    reporter: &'a mut Reporter,
    out: Vec<Inline>,
    text: String,
}

/// Parse one paragraph (or title) of inline markup.
pub(crate) fn parse_inline(
    src: &str,
    line: usize,
    reporter: &mut Reporter,
) -> Result<Vec<Inline>, RenderError> {
    let mut scanner = Scanner {
        chars: src.chars().collect(),
        line,
        reporter,
        out: Vec::new(),
        text: String::new(),
    };
    scanner.run()?;
    Ok(scanner.finish())
}

impl Scanner<'_> {
    fn run(&mut self) -> Result<(), RenderError> {
        let n = self.chars.len();
        let mut i = 0;
        while i < n {
            let c = self.chars[i];

            if c == '\\' {
                if let Some(&next) = self.chars.get(i + 1)
                    && !next.is_whitespace()
                {
                    self.text.push(next);
                }
                i += 2;
                continue;
            }

            if self.start_ok(i)
                && let Some(next) = self.markup_at(i)?
            {
                i = next;
                continue;
            }

            self.text.push(c);
            i += 1;
        }
        Ok(())
    }

    /// Try every construct that may begin at `i`; returns the index after it.
    fn markup_at(&mut self, i: usize) -> Result<Option<usize>, RenderError> {
        if self.starts_with(i, "``") && self.nonspace_at(i + 2) {
            return self.delimited(i, "``", "literal", |s| Inline::Literal(s.to_string()));
        }
        if self.starts_with(i, "**") && self.nonspace_at(i + 2) {
            return self.delimited(i, "**", "strong", |s| Inline::Strong(unescape(s)));
        }
        if self.chars[i] == '*' && self.nonspace_at(i + 1) {
            return self.delimited(i, "*", "emphasis", |s| Inline::Emphasis(unescape(s)));
        }
        if self.chars[i] == ':'
            && let Some(next) = self.role(i)?
        {
            return Ok(Some(next));
        }
        if self.chars[i] == '`' && self.nonspace_at(i + 1) {
            return self.interpreted(i);
        }
        if let Some(next) = self.standalone_uri(i) {
            return Ok(Some(next));
        }
        if self.chars[i].is_alphanumeric() {
            return Ok(Some(self.word(i)));
        }
        Ok(None)
    }

    fn delimited(
        &mut self,
        i: usize,
        delim: &str,
        kind: &str,
        build: impl Fn(&str) -> Inline,
    ) -> Result<Option<usize>, RenderError> {
        let from = i + delim.chars().count();
        match self.find_end(from, delim, delim != "``") {
            Some(end) => {
                let content: String = self.chars[from..end].iter().collect();
                self.push(build(&content));
                Ok(Some(end + delim.chars().count()))
            }
            None => {
                self.warn_unclosed(kind)?;
                self.text.push_str(delim);
                Ok(Some(from))
            }
        }
    }

    /// `:role:`content``
    fn role(&mut self, i: usize) -> Result<Option<usize>, RenderError> {
        let n = self.chars.len();
        let mut j = i + 1;
        while j < n && (self.chars[j].is_ascii_alphanumeric() || "-_.+".contains(self.chars[j])) {
            j += 1;
        }
        if j == i + 1 || j + 1 >= n || self.chars[j] != ':' || self.chars[j + 1] != '`' {
            return Ok(None);
        }
        let name: String = self.chars[i + 1..j].iter().collect();
        let from = j + 2;
        let Some(end) = self.find_end(from, "`", true) else {
            self.warn_unclosed("interpreted text or phrase reference")?;
            return Ok(None);
        };
        let content: String = self.chars[from..end].iter().collect();

        let inline = match name.to_ascii_lowercase().as_str() {
            "emphasis" => Inline::Emphasis(unescape(&content)),
            "strong" => Inline::Strong(unescape(&content)),
            "literal" | "code" => Inline::Literal(content),
            "title-reference" | "title" | "t" => Inline::Cite(unescape(&content)),
            _ => {
                self.reporter.report(
                    Severity::Error,
                    self.line,
                    format!("Unknown interpreted text role \"{name}\"."),
                )?;
                Inline::Text(unescape(&content))
            }
        };
        self.push(inline);
        Ok(Some(end + 1))
    }

    /// `` `title` ``, `` `name`_ ``, `` `text <uri>`_ ``
    fn interpreted(&mut self, i: usize) -> Result<Option<usize>, RenderError> {
        let n = self.chars.len();
        let from = i + 1;
        let mut k = from + 1;
        while k < n {
            if self.chars[k] == '`' && !self.chars[k - 1].is_whitespace() && self.chars[k - 1] != '\\'
            {
                let underscores = self.chars[k + 1..]
                    .iter()
                    .take(2)
                    .take_while(|&&c| c == '_')
                    .count();
                if self.end_ok(k + 1 + underscores) {
                    let content: String = self.chars[from..k].iter().collect();
                    let inline = if underscores == 0 {
                        Inline::Cite(unescape(&content))
                    } else {
                        phrase_reference(&content)
                    };
                    self.push(inline);
                    return Ok(Some(k + 1 + underscores));
                }
            }
            k += 1;
        }
        self.warn_unclosed("interpreted text or phrase reference")?;
        self.text.push('`');
        Ok(Some(from))
    }

    fn standalone_uri(&mut self, i: usize) -> Option<usize> {
        let scheme = URI_SCHEMES.iter().find(|s| self.starts_with(i, s))?;
        let n = self.chars.len();
        let mut end = i;
        while end < n && !self.chars[end].is_whitespace() && !"<>\"`".contains(self.chars[end]) {
            end += 1;
        }
        while end > i && ".,;:!?)'".contains(self.chars[end - 1]) {
            end -= 1;
        }
        if end <= i + scheme.len() {
            return None;
        }
        let uri: String = self.chars[i..end].iter().collect();
        self.push(Inline::Link {
            text: uri.clone(),
            uri,
        });
        Some(end)
    }

    /// A word, which becomes a reference when it ends in a single `_`.
    fn word(&mut self, i: usize) -> usize {
        let n = self.chars.len();
        let mut j = i;
        while j < n {
            let c = self.chars[j];
            let inner_punct = "-._+:".contains(c) && self.chars.get(j + 1).is_some_and(|c| c.is_alphanumeric());
            if c.is_alphanumeric() || inner_punct {
                j += 1;
            } else {
                break;
            }
        }
        let word: String = self.chars[i..j].iter().collect();
        if j < n && self.chars[j] == '_' && self.chars.get(j + 1) != Some(&'_') && self.end_ok(j + 1) {
            self.push(Inline::Reference {
                text: word.clone(),
                name: word,
            });
            return j + 1;
        }
        self.text.push_str(&word);
        j
    }

    fn find_end(&self, from: usize, delim: &str, honor_escapes: bool) -> Option<usize> {
        let len = delim.chars().count();
        let n = self.chars.len();
        let mut k = from + 1;
        while k + len <= n {
            let prev = self.chars[k - 1];
            if self.starts_with(k, delim)
                && !prev.is_whitespace()
                && !(honor_escapes && prev == '\\')
                && self.end_ok(k + len)
            {
                return Some(k);
            }
            k += 1;
        }
        None
    }

    fn warn_unclosed(&mut self, kind: &str) -> Result<(), RenderError> {
        self.reporter.report(
            Severity::Warning,
            self.line,
            format!("Inline {kind} start-string without end-string."),
        )
    }

    fn start_ok(&self, i: usize) -> bool {
        i == 0 || {
            let prev = self.chars[i - 1];
            prev.is_whitespace() || OPENERS.contains(&prev)
        }
    }

    fn end_ok(&self, j: usize) -> bool {
        self.chars
            .get(j)
            .is_none_or(|c| c.is_whitespace() || CLOSERS.contains(c))
    }

    fn nonspace_at(&self, i: usize) -> bool {
        self.chars.get(i).is_some_and(|c| !c.is_whitespace())
    }

    fn starts_with(&self, i: usize, pat: &str) -> bool {
        let mut k = i;
        for p in pat.chars() {
            if self.chars.get(k) != Some(&p) {
                return false;
            }
            k += 1;
        }
        true
    }

    fn push(&mut self, inline: Inline) {
        if !self.text.is_empty() {
            self.out.push(Inline::Text(std::mem::take(&mut self.text)));
        }
        self.out.push(inline);
    }

    fn finish(mut self) -> Vec<Inline> {
        if !self.text.is_empty() {
            self.out.push(Inline::Text(self.text));
        }
        self.out
    }
}

/// Split `text <uri>` into a link, or treat the phrase as a target name.
fn phrase_reference(content: &str) -> Inline {
    let trimmed = content.trim();
    if trimmed.ends_with('>')
        && let Some(open) = trimmed.rfind('<')
        && (open == 0 || trimmed[..open].ends_with(char::is_whitespace))
    {
        let uri: String = trimmed[open + 1..trimmed.len() - 1]
            .split_whitespace()
            .collect();
        let label = trimmed[..open].trim();
        let text = if label.is_empty() { uri.clone() } else { unescape(label) };
        return match uri.strip_suffix('_') {
            Some(alias) => Inline::Reference {
                text,
                name: alias.to_string(),
            },
            None => Inline::Link { text, uri },
        };
    }
    let text = unescape(trimmed);
    Inline::Reference {
        name: text.clone(),
        text,
    }
}

/// Drop backslash escapes: `\*` becomes `*`, `\ ` disappears.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next()
                && !next.is_whitespace()
            {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Render inline content to HTML, resolving named references.
pub(crate) fn to_html(
    inlines: &[Inline],
    targets: &Targets,
    line: usize,
    reporter: &mut Reporter,
) -> Result<String, RenderError> {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Emphasis(text) => write!(out, "<em>{}</em>", escape_html(text)).unwrap(),
            Inline::Strong(text) => write!(out, "<strong>{}</strong>", escape_html(text)).unwrap(),
            Inline::Literal(text) => write!(
                out,
                "<code class=\"docutils literal\">{}</code>",
                escape_html(text)
            )
            .unwrap(),
            Inline::Cite(text) => write!(out, "<cite>{}</cite>", escape_html(text)).unwrap(),
            Inline::Link { text, uri } => write!(
                out,
                "<a class=\"reference external\" href=\"{}\">{}</a>",
                escape_html(uri),
                escape_html(text)
            )
            .unwrap(),
            Inline::Reference { text, name } => match targets.resolve(name) {
                Some(href) => {
                    let class = if href.starts_with('#') {
                        "reference internal"
                    } else {
                        "reference external"
                    };
                    write!(
                        out,
                        "<a class=\"{class}\" href=\"{}\">{}</a>",
                        escape_html(href),
                        escape_html(text)
                    )
                    .unwrap();
                }
                None => {
                    reporter.report(
                        Severity::Error,
                        line,
                        format!("Unknown target name: \"{}\".", name.to_lowercase()),
                    )?;
                    out.push_str(&escape_html(text));
                }
            },
        }
    }
    Ok(out)
}

/// Plain text of inline content, used for titles and identifiers.
pub(crate) fn to_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(t)
            | Inline::Emphasis(t)
            | Inline::Strong(t)
            | Inline::Literal(t)
            | Inline::Cite(t) => t.as_str(),
            Inline::Link { text, .. } | Inline::Reference { text, .. } => text.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderConfig;

    fn parse(src: &str) -> Vec<Inline> {
        let mut reporter = Reporter::new(&RenderConfig::default());
        parse_inline(src, 1, &mut reporter).unwrap()
    }

    fn html(src: &str) -> String {
        let mut reporter = Reporter::new(&RenderConfig::default());
        let mut targets = Targets::default();
        targets.insert("install", "#install".to_string());
        targets.insert("docs", "https://example.com/docs".to_string());
        let inlines = parse_inline(src, 1, &mut reporter).unwrap();
        to_html(&inlines, &targets, 1, &mut reporter).unwrap()
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(
            parse("Just words, nothing more."),
            vec![Inline::Text("Just words, nothing more.".to_string())]
        );
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(
            html("a *quick* and **bold** move"),
            "a <em>quick</em> and <strong>bold</strong> move"
        );
    }

    #[test]
    fn test_literal_keeps_markup_chars() {
        assert_eq!(
            html("run ``cargo *build*`` now"),
            "run <code class=\"docutils literal\">cargo *build*</code> now"
        );
    }

    #[test]
    fn test_spaced_asterisk_is_text() {
        assert_eq!(html("2 * 3 = 6"), "2 * 3 = 6");
    }

    #[test]
    fn test_escaped_asterisk() {
        assert_eq!(html(r"\*not emphasis\*"), "*not emphasis*");
    }

    #[test]
    fn test_embedded_uri_link() {
        assert_eq!(
            html("see `the site <https://example.com/>`_."),
            "see <a class=\"reference external\" href=\"https://example.com/\">the site</a>."
        );
    }

    #[test]
    fn test_named_references_resolve() {
        assert_eq!(
            html("read docs_ and `Install`_"),
            "read <a class=\"reference external\" href=\"https://example.com/docs\">docs</a> and \
             <a class=\"reference internal\" href=\"#install\">Install</a>"
        );
    }

    #[test]
    fn test_snake_case_is_not_a_reference() {
        assert_eq!(html("call snake_case here"), "call snake_case here");
    }

    #[test]
    fn test_standalone_uri() {
        assert_eq!(
            html("visit https://example.com/a."),
            "visit <a class=\"reference external\" href=\"https://example.com/a\">https://example.com/a</a>."
        );
    }

    #[test]
    fn test_roles() {
        assert_eq!(
            html(":code:`x < y` and :title-reference:`Dune`"),
            "<code class=\"docutils literal\">x &lt; y</code> and <cite>Dune</cite>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(html("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_unclosed_emphasis_halts_at_warning() {
        let mut reporter = Reporter::new(&RenderConfig::default());
        let err = parse_inline("an *unclosed start", 4, &mut reporter).unwrap_err();

        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(err.diagnostic.line, 4);
        assert_eq!(
            err.diagnostic.message,
            "Inline emphasis start-string without end-string."
        );
    }

    #[test]
    fn test_unknown_target_is_error() {
        let mut reporter = Reporter::new(&RenderConfig::default());
        let inlines = parse_inline("see nowhere_", 2, &mut reporter).unwrap();
        let err = to_html(&inlines, &Targets::default(), 2, &mut reporter).unwrap_err();

        assert_eq!(err.severity(), Severity::Error);
        assert!(err.diagnostic.message.contains("nowhere"));
    }

    #[test]
    fn test_unknown_role_is_error() {
        let mut reporter = Reporter::new(&RenderConfig::default());
        let err = parse_inline(":glitter:`x`", 1, &mut reporter).unwrap_err();
        assert_eq!(err.severity(), Severity::Error);
    }

    #[test]
    fn test_to_text_strips_markup() {
        assert_eq!(to_text(&parse("Getting *Started* with ``rst``")), "Getting Started with rst");
    }
}
