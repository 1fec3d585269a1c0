//! Line-based block parser.
//!
//! The source is split into lines, then scanned top to bottom. Indentation
//! decides structure: an indented run after a paragraph is a block quote (or
//! a literal block after `::`), list items own the lines indented past their
//! marker, and explicit markup (`.. `) owns its indented continuation.
//!
//! Section titles are collected as flat [`Item::Title`] markers and nested
//! afterwards by [`nest_sections`], using the order in which adornment styles
//! first appear to assign levels.

use crate::render::{RenderError, Reporter, Severity};

use super::inline::{Inline, parse_inline};

const ADORNMENT_CHARS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const ADMONITIONS: &[&str] = &[
    "attention",
    "caution",
    "danger",
    "error",
    "hint",
    "important",
    "note",
    "tip",
    "warning",
];

/// A body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    Section(Section),
    Paragraph {
        text: String,
        line: usize,
    },
    LiteralBlock {
        text: String,
        language: Option<String>,
    },
    BlockQuote(Vec<Block>),
    BulletList(Vec<Vec<Block>>),
    EnumeratedList {
        start: usize,
        items: Vec<Vec<Block>>,
    },
    DefinitionList(Vec<DefinitionItem>),
    Transition,
    Admonition {
        kind: String,
        body: Vec<Block>,
    },
    Image {
        uri: String,
        alt: Option<String>,
    },
    Target(Target),
}

impl Block {
    /// Targets produce no visible output of their own.
    pub fn is_invisible(&self) -> bool {
        matches!(self, Block::Target(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Section {
    pub title: Vec<Inline>,
    pub line: usize,
    /// Names from explicit targets placed right before the title.
    pub names: Vec<String>,
    /// Assigned identifiers; the first one goes on the wrapper.
    pub ids: Vec<String>,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefinitionItem {
    pub term: String,
    pub line: usize,
    pub definition: Vec<Block>,
}

/// `.. _name:` (internal) or `.. _name: uri` (external).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    pub name: String,
    pub refuri: Option<String>,
    /// Assigned identifier for internal targets.
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Style {
    ch: char,
    overline: bool,
}

#[derive(Debug)]
pub(crate) enum Item {
    Title {
        text: String,
        style: Style,
        line: usize,
    },
    Block(Block),
}

#[derive(Debug, Clone)]
struct Line {
    no: usize,
    text: String,
}

impl Line {
    fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet(char),
    Enumerated,
}

struct ListMarker {
    kind: ListKind,
    value: usize,
    /// Column where the item text starts.
    offset: usize,
}

/// Parse a whole document into blocks with nested sections.
pub(crate) fn parse_document(source: &str, r: &mut Reporter) -> Result<Vec<Block>, RenderError> {
    let lines = split_lines(source);
    let items = parse_items(&lines, true, r)?;
    nest_sections(items, r)
}

fn split_lines(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .map(|(n, raw)| {
            let mut text = String::with_capacity(raw.len());
            for c in raw.chars() {
                if c == '\t' {
                    let pad = 8 - text.chars().count() % 8;
                    text.extend(std::iter::repeat_n(' ', pad));
                } else {
                    text.push(c);
                }
            }
            Line {
                no: n + 1,
                text: text.trim_end().to_string(),
            }
        })
        .collect()
}

/// Remove the common indentation of a run of lines.
fn dedent(lines: &[Line]) -> Vec<Line> {
    let amount = lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(Line::indent)
        .min()
        .unwrap_or(0);
    lines.iter().map(|l| shift(l, amount)).collect()
}

fn shift(line: &Line, amount: usize) -> Line {
    Line {
        no: line.no,
        text: if line.is_blank() {
            String::new()
        } else {
            line.text[amount.min(line.indent())..].to_string()
        },
    }
}

/// End of the run of blank or indented lines starting at `start`.
fn indented_extent(lines: &[Line], start: usize) -> usize {
    let mut end = start;
    while end < lines.len() && (lines[end].is_blank() || lines[end].indent() > 0) {
        end += 1;
    }
    end
}

fn is_adornment(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if ADORNMENT_CHARS.contains(first) => chars.all(|c| c == first),
        _ => false,
    }
}

fn parse_body(lines: &[Line], r: &mut Reporter) -> Result<Vec<Block>, RenderError> {
    Ok(parse_items(lines, false, r)?
        .into_iter()
        .filter_map(|item| match item {
            Item::Block(block) => Some(block),
            Item::Title { .. } => None,
        })
        .collect())
}

fn parse_items(lines: &[Line], sections: bool, r: &mut Reporter) -> Result<Vec<Item>, RenderError> {
    let mut items = Vec::new();
    let mut literal_next = false;
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        if line.is_blank() {
            i += 1;
            continue;
        }

        if line.indent() > 0 {
            let end = indented_extent(lines, i);
            let block = dedent(&lines[i..end]);
            let parsed = if literal_next {
                literal_block(&block, None)
            } else {
                Block::BlockQuote(parse_body(&block, r)?)
            };
            items.push(Item::Block(parsed));
            literal_next = false;
            i = end;
            continue;
        }

        if literal_next {
            r.report(Severity::Warning, line.no, "Literal block expected; none found.")?;
            literal_next = false;
        }

        if line.text == ".." || line.text.starts_with(".. ") {
            let end = indented_extent(lines, i + 1);
            if let Some(block) = explicit_markup(&lines[i..end], r)? {
                items.push(Item::Block(block));
            }
            i = end;
            continue;
        }

        if sections && let Some((title, next)) = section_title(lines, i, r)? {
            items.push(title);
            i = next;
            continue;
        }

        if is_transition(lines, i) {
            items.push(Item::Block(Block::Transition));
            i += 1;
            continue;
        }

        if let Some(marker) = list_marker(&line.text) {
            let (list, next) = parse_list(lines, i, marker, r)?;
            items.push(Item::Block(list));
            i = next;
            continue;
        }

        if lines.get(i + 1).is_some_and(|l| !l.is_blank() && l.indent() > 0) {
            let (list, next) = parse_definition_list(lines, i, r)?;
            items.push(Item::Block(list));
            i = next;
            continue;
        }

        let mut end = i + 1;
        while end < lines.len() && !lines[end].is_blank() && lines[end].indent() == 0 {
            end += 1;
        }
        if end < lines.len() && !lines[end].is_blank() {
            r.report(Severity::Error, lines[end].no, "Unexpected indentation.")?;
        }

        let joined = lines[i..end]
            .iter()
            .map(|l| l.text.trim())
            .collect::<Vec<_>>()
            .join("\n");
        let (text, literal) = strip_literal_marker(&joined);
        literal_next = literal;
        if !text.is_empty() {
            items.push(Item::Block(Block::Paragraph { text, line: line.no }));
        }
        i = end;
    }

    if literal_next && let Some(last) = lines.last() {
        r.report(Severity::Warning, last.no, "Literal block expected; none found.")?;
    }

    Ok(items)
}

/// Handle a trailing `::`: `Para::` keeps one colon, `Para ::` and a lone
/// `::` keep none.
fn strip_literal_marker(text: &str) -> (String, bool) {
    let Some(stripped) = text.strip_suffix("::") else {
        return (text.to_string(), false);
    };
    if stripped.trim().is_empty() {
        (String::new(), true)
    } else if stripped.ends_with(char::is_whitespace) {
        (stripped.trim_end().to_string(), true)
    } else {
        (format!("{stripped}:"), true)
    }
}

fn literal_block(lines: &[Line], language: Option<String>) -> Block {
    let mut text: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    while text.last().is_some_and(|l| l.is_empty()) {
        text.pop();
    }
    while text.first().is_some_and(|l| l.is_empty()) {
        text.remove(0);
    }
    Block::LiteralBlock {
        text: text.join("\n"),
        language,
    }
}

fn section_title(
    lines: &[Line],
    i: usize,
    r: &mut Reporter,
) -> Result<Option<(Item, usize)>, RenderError> {
    let line = &lines[i];

    if is_adornment(&line.text) {
        let (Some(title), Some(under)) = (lines.get(i + 1), lines.get(i + 2)) else {
            return Ok(None);
        };
        if title.is_blank() || !is_adornment(&under.text) || is_adornment(&title.text) {
            return Ok(None);
        }
        if under.text != line.text {
            r.report(Severity::Severe, under.no, "Title overline & underline mismatch.")?;
        }
        let text = title.text.trim();
        if line.text.chars().count() < text.chars().count() {
            r.report(Severity::Warning, line.no, "Title overline too short.")?;
        }
        let style = Style {
            ch: line.text.chars().next().unwrap_or('='),
            overline: true,
        };
        let item = Item::Title {
            text: text.to_string(),
            style,
            line: title.no,
        };
        return Ok(Some((item, i + 3)));
    }

    let Some(under) = lines.get(i + 1) else {
        return Ok(None);
    };
    if !is_adornment(&under.text) {
        return Ok(None);
    }
    let text = line.text.trim();
    let (title_len, under_len) = (text.chars().count(), under.text.chars().count());
    if under_len < title_len {
        if under_len < 4 {
            r.report(
                Severity::Info,
                under.no,
                "Possible title underline, too short for the title.",
            )?;
        } else {
            r.report(Severity::Warning, under.no, "Title underline too short.")?;
        }
    }
    let style = Style {
        ch: under.text.chars().next().unwrap_or('='),
        overline: false,
    };
    let item = Item::Title {
        text: text.to_string(),
        style,
        line: line.no,
    };
    Ok(Some((item, i + 2)))
}

fn is_transition(lines: &[Line], i: usize) -> bool {
    let text = &lines[i].text;
    is_adornment(text)
        && text.chars().count() >= 4
        && (i == 0 || lines[i - 1].is_blank())
        && lines.get(i + 1).is_none_or(Line::is_blank)
}

fn list_marker(text: &str) -> Option<ListMarker> {
    let bytes = text.as_bytes();
    let (kind, value, marker_len) = match *bytes.first()? {
        b'-' | b'*' | b'+' => (ListKind::Bullet(bytes[0] as char), 0, 1),
        b'#' if bytes.get(1) == Some(&b'.') => (ListKind::Enumerated, 0, 2),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if bytes.get(digits) != Some(&b'.') {
                return None;
            }
            let value = text[..digits].parse().ok()?;
            (ListKind::Enumerated, value, digits + 1)
        }
        _ => return None,
    };

    let rest = &text[marker_len..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    let spaces = rest.len() - rest.trim_start().len();
    Some(ListMarker {
        kind,
        value,
        offset: if rest.trim().is_empty() {
            marker_len + 1
        } else {
            marker_len + spaces
        },
    })
}

fn parse_list(
    lines: &[Line],
    start: usize,
    first: ListMarker,
    r: &mut Reporter,
) -> Result<(Block, usize), RenderError> {
    let kind = first.kind;
    let first_value = first.value.max(1);
    let mut items = Vec::new();
    let mut idx = start;
    let mut marker = first;

    loop {
        let mut end = idx + 1;
        while end < lines.len() && (lines[end].is_blank() || lines[end].indent() >= marker.offset) {
            end += 1;
        }

        let head = &lines[idx];
        let mut body = vec![Line {
            no: head.no,
            text: head.text.get(marker.offset..).unwrap_or("").to_string(),
        }];
        body.extend(lines[idx + 1..end].iter().map(|l| shift(l, marker.offset)));
        items.push(parse_body(&body, r)?);

        match lines.get(end) {
            Some(next) if next.indent() == 0 => match list_marker(&next.text) {
                Some(m) if m.kind == kind => {
                    marker = m;
                    idx = end;
                    continue;
                }
                _ => {}
            },
            _ => {}
        }

        if end < lines.len() && !lines[end - 1].is_blank() {
            let name = match kind {
                ListKind::Bullet(_) => "Bullet",
                ListKind::Enumerated => "Enumerated",
            };
            r.report(
                Severity::Warning,
                lines[end].no,
                format!("{name} list ends without a blank line; unexpected unindent."),
            )?;
        }

        let block = match kind {
            ListKind::Bullet(_) => Block::BulletList(items),
            ListKind::Enumerated => Block::EnumeratedList {
                start: first_value,
                items,
            },
        };
        return Ok((block, end));
    }
}

fn parse_definition_list(
    lines: &[Line],
    start: usize,
    r: &mut Reporter,
) -> Result<(Block, usize), RenderError> {
    let mut items = Vec::new();
    let mut idx = start;

    loop {
        let term = &lines[idx];
        let end = indented_extent(lines, idx + 1);
        let definition = parse_body(&dedent(&lines[idx + 1..end]), r)?;
        items.push(DefinitionItem {
            term: term.text.trim().to_string(),
            line: term.no,
            definition,
        });

        let continues = lines.get(end).is_some_and(|next| {
            next.indent() == 0
                && !next.text.starts_with("..")
                && list_marker(&next.text).is_none()
                && lines
                    .get(end + 1)
                    .is_some_and(|l| !l.is_blank() && l.indent() > 0)
        });
        if !continues {
            return Ok((Block::DefinitionList(items), end));
        }
        idx = end;
    }
}

/// Comments, targets, and directives.
fn explicit_markup(lines: &[Line], r: &mut Reporter) -> Result<Option<Block>, RenderError> {
    let first = &lines[0];
    let head = first.text.get(3..).unwrap_or("").trim();
    let content = dedent(&lines[1..]);

    if let Some(target) = head.strip_prefix('_') {
        return hyperlink_target(target, &content, first.no, r);
    }

    if let Some((name, args)) = directive_head(head) {
        return directive(name, args, &content, first.no, r);
    }

    Ok(None)
}

fn hyperlink_target(
    text: &str,
    content: &[Line],
    line: usize,
    r: &mut Reporter,
) -> Result<Option<Block>, RenderError> {
    let split = match text.strip_prefix('`') {
        Some(quoted) => quoted
            .find("`:")
            .map(|close| (&quoted[..close], &quoted[close + 2..])),
        None => text
            .find(": ")
            .map(|pos| (&text[..pos], &text[pos + 2..]))
            .or_else(|| text.strip_suffix(':').map(|name| (name, ""))),
    };

    let Some((name, uri_head)) = split.filter(|(name, _)| !name.trim().is_empty()) else {
        r.report(Severity::Error, line, "Malformed hyperlink target.")?;
        return Ok(None);
    };

    let uri: String = std::iter::once(uri_head)
        .chain(content.iter().map(|l| l.text.as_str()))
        .flat_map(str::split_whitespace)
        .collect();

    Ok(Some(Block::Target(Target {
        name: name.trim().to_string(),
        refuri: (!uri.is_empty()).then_some(uri),
        id: String::new(),
    })))
}

fn directive_head(head: &str) -> Option<(&str, &str)> {
    let pos = head.find("::")?;
    let name = &head[..pos];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| (name, head[pos + 2..].trim()))
}

fn directive(
    name: &str,
    args: &str,
    content: &[Line],
    line: usize,
    r: &mut Reporter,
) -> Result<Option<Block>, RenderError> {
    let name = name.to_ascii_lowercase();

    let option_count = content
        .iter()
        .take_while(|l| !l.is_blank() && l.text.starts_with(':'))
        .count();
    let options: Vec<(String, String)> = content[..option_count]
        .iter()
        .filter_map(|l| {
            let rest = l.text.strip_prefix(':')?;
            let (key, value) = rest.split_once(':')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect();
    let body = &content[option_count..];
    let body_is_empty = body.iter().all(Line::is_blank);

    match name.as_str() {
        kind if ADMONITIONS.contains(&kind) => {
            let mut source = Vec::new();
            if !args.is_empty() {
                source.push(Line {
                    no: line,
                    text: args.to_string(),
                });
                source.push(Line {
                    no: line,
                    text: String::new(),
                });
            }
            source.extend(body.iter().cloned());
            if source.iter().all(Line::is_blank) {
                r.report(
                    Severity::Error,
                    line,
                    format!("The \"{kind}\" admonition is empty; content required."),
                )?;
                return Ok(None);
            }
            Ok(Some(Block::Admonition {
                kind: kind.to_string(),
                body: parse_body(&source, r)?,
            }))
        }
        "code" | "code-block" | "sourcecode" => {
            if body_is_empty {
                r.report(
                    Severity::Error,
                    line,
                    format!("Content block expected for the \"{name}\" directive; none found."),
                )?;
                return Ok(None);
            }
            let language = args.split_whitespace().next().map(str::to_string);
            Ok(Some(literal_block(body, language)))
        }
        "image" => {
            let uri: String = args.split_whitespace().collect();
            if uri.is_empty() {
                r.report(
                    Severity::Error,
                    line,
                    "Error in \"image\" directive: 1 argument(s) required, 0 supplied.",
                )?;
                return Ok(None);
            }
            let alt = options
                .into_iter()
                .find(|(key, _)| key == "alt")
                .map(|(_, value)| value);
            Ok(Some(Block::Image { uri, alt }))
        }
        _ => {
            r.report(
                Severity::Error,
                line,
                format!("Unknown directive type \"{name}\"."),
            )?;
            Ok(None)
        }
    }
}

/// Turn the flat title markers into nested sections.
pub(crate) fn nest_sections(items: Vec<Item>, r: &mut Reporter) -> Result<Vec<Block>, RenderError> {
    let mut root = Vec::new();
    let mut open: Vec<Section> = Vec::new();
    let mut styles: Vec<Style> = Vec::new();

    for item in items {
        let (text, style, line) = match item {
            Item::Block(block) => {
                container(&mut root, &mut open).push(block);
                continue;
            }
            Item::Title { text, style, line } => (text, style, line),
        };

        let level = match styles.iter().position(|s| *s == style) {
            Some(k) if k <= open.len() => k + 1,
            None if styles.len() == open.len() => {
                styles.push(style);
                styles.len()
            }
            _ => {
                r.report(Severity::Severe, line, "Title level inconsistent.")?;
                open.len() + 1
            }
        };

        let names = take_trailing_targets(container(&mut root, &mut open));
        close_sections(&mut root, &mut open, level - 1);
        open.push(Section {
            title: parse_inline(&text, line, r)?,
            line,
            names,
            ids: Vec::new(),
            children: Vec::new(),
        });
    }

    close_sections(&mut root, &mut open, 0);
    Ok(root)
}

fn container<'a>(root: &'a mut Vec<Block>, open: &'a mut [Section]) -> &'a mut Vec<Block> {
    match open.last_mut() {
        Some(section) => &mut section.children,
        None => root,
    }
}

fn close_sections(root: &mut Vec<Block>, open: &mut Vec<Section>, depth: usize) {
    while open.len() > depth {
        if let Some(done) = open.pop() {
            container(root, open).push(Block::Section(done));
        }
    }
}

/// Internal targets directly before a title name that section.
fn take_trailing_targets(blocks: &mut Vec<Block>) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(Block::Target(target)) = blocks.last()
        && target.refuri.is_none()
    {
        names.push(target.name.clone());
        blocks.pop();
    }
    names.reverse();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderConfig;

    fn parse(src: &str) -> Vec<Block> {
        let mut reporter = Reporter::new(&RenderConfig::default());
        parse_document(src, &mut reporter).unwrap()
    }

    fn parse_err(src: &str) -> RenderError {
        let mut reporter = Reporter::new(&RenderConfig::default());
        parse_document(src, &mut reporter).unwrap_err()
    }

    fn paragraph(text: &str, line: usize) -> Block {
        Block::Paragraph {
            text: text.to_string(),
            line,
        }
    }

    fn section(blocks: &[Block], idx: usize) -> &Section {
        match &blocks[idx] {
            Block::Section(s) => s,
            other => panic!("expected section, got {other:?}"),
        }
    }

    #[test]
    fn test_paragraphs_join_lines() {
        assert_eq!(
            parse("first line\nsecond line\n\nnext"),
            vec![
                paragraph("first line\nsecond line", 1),
                paragraph("next", 4)
            ]
        );
    }

    #[test]
    fn test_sections_nest_by_style_order() {
        let blocks = parse("A\n=\n\nB\n-\n\ntext\n\nC\n=\n");
        assert_eq!(blocks.len(), 2);

        let a = section(&blocks, 0);
        assert_eq!(a.title, vec![Inline::Text("A".to_string())]);
        let b = section(&a.children, 0);
        assert_eq!(b.children, vec![paragraph("text", 7)]);

        let c = section(&blocks, 1);
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_overline_titles() {
        let blocks = parse("=====\nIntro\n=====\n\nBody.\n");
        let intro = section(&blocks, 0);
        assert_eq!(intro.line, 2);
        assert_eq!(intro.children, vec![paragraph("Body.", 5)]);
    }

    #[test]
    fn test_short_underline_warns() {
        let err = parse_err("Installation\n=======\n");
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(err.diagnostic.message, "Title underline too short.");
        assert_eq!(err.diagnostic.line, 2);
    }

    #[test]
    fn test_very_short_underline_is_still_a_title() {
        let mut reporter = Reporter::new(&RenderConfig::default());
        let blocks = parse_document("Three\n~~~\n\nbody\n", &mut reporter).unwrap();

        assert_eq!(section(&blocks, 0).children, vec![paragraph("body", 4)]);
        assert_eq!(reporter.diagnostics()[0].severity, Severity::Info);
    }

    #[test]
    fn test_inconsistent_title_level_is_severe() {
        let err = parse_err("A\n=\n\nB\n-\n\nC\n=\n\nD\n~\n\nE\n-\n\nF\n^\n");
        assert_eq!(err.severity(), Severity::Severe);
    }

    #[test]
    fn test_literal_block_after_double_colon() {
        assert_eq!(
            parse("Example::\n\n    let x = 1;\n      indented\n\nAfter."),
            vec![
                paragraph("Example:", 1),
                Block::LiteralBlock {
                    text: "let x = 1;\n  indented".to_string(),
                    language: None
                },
                paragraph("After.", 6),
            ]
        );
    }

    #[test]
    fn test_bare_double_colon_drops_paragraph() {
        let blocks = parse("::\n\n    raw *text*\n");
        assert_eq!(
            blocks,
            vec![Block::LiteralBlock {
                text: "raw *text*".to_string(),
                language: None
            }]
        );
    }

    #[test]
    fn test_block_quote() {
        assert_eq!(
            parse("Said:\n\n    Quoted words.\n"),
            vec![
                paragraph("Said:", 1),
                Block::BlockQuote(vec![paragraph("Quoted words.", 3)])
            ]
        );
    }

    #[test]
    fn test_bullet_list_items() {
        assert_eq!(
            parse("- one\n- two\n  continued\n\n- three\n"),
            vec![Block::BulletList(vec![
                vec![paragraph("one", 1)],
                vec![paragraph("two\ncontinued", 2)],
                vec![paragraph("three", 5)],
            ])]
        );
    }

    #[test]
    fn test_enumerated_list_start() {
        assert_eq!(
            parse("3. three\n4. four\n"),
            vec![Block::EnumeratedList {
                start: 3,
                items: vec![vec![paragraph("three", 1)], vec![paragraph("four", 2)]],
            }]
        );
    }

    #[test]
    fn test_list_without_trailing_blank_warns() {
        let err = parse_err("- one\nafter\n");
        assert_eq!(
            err.diagnostic.message,
            "Bullet list ends without a blank line; unexpected unindent."
        );
    }

    #[test]
    fn test_definition_list() {
        assert_eq!(
            parse("term\n    definition\nother\n    more\n"),
            vec![Block::DefinitionList(vec![
                DefinitionItem {
                    term: "term".to_string(),
                    line: 1,
                    definition: vec![paragraph("definition", 2)],
                },
                DefinitionItem {
                    term: "other".to_string(),
                    line: 3,
                    definition: vec![paragraph("more", 4)],
                },
            ])]
        );
    }

    #[test]
    fn test_transition() {
        assert_eq!(
            parse("before\n\n----\n\nafter\n"),
            vec![paragraph("before", 1), Block::Transition, paragraph("after", 5)]
        );
    }

    #[test]
    fn test_comment_is_dropped() {
        assert_eq!(
            parse(".. a comment\n   spanning lines\n\ntext\n"),
            vec![paragraph("text", 4)]
        );
    }

    #[test]
    fn test_targets() {
        assert_eq!(
            parse(".. _docs: https://example.com/\n   docs/\n.. _`Read Me`:\n"),
            vec![
                Block::Target(Target {
                    name: "docs".to_string(),
                    refuri: Some("https://example.com/docs/".to_string()),
                    id: String::new(),
                }),
                Block::Target(Target {
                    name: "Read Me".to_string(),
                    refuri: None,
                    id: String::new(),
                }),
            ]
        );
    }

    #[test]
    fn test_target_before_title_names_section() {
        let blocks = parse("Top\n===\n\n.. _features-short:\n\nShort Features\n--------------\n");
        let top = section(&blocks, 0);
        let features = section(&top.children, 0);
        assert_eq!(features.names, vec!["features-short".to_string()]);
        assert_eq!(top.children.len(), 1);
    }

    #[test]
    fn test_code_directive() {
        assert_eq!(
            parse(".. code-block:: rust\n\n   fn main() {}\n"),
            vec![Block::LiteralBlock {
                text: "fn main() {}".to_string(),
                language: Some("rust".to_string()),
            }]
        );
    }

    #[test]
    fn test_admonition_with_argument_text() {
        assert_eq!(
            parse(".. note:: Mind the gap.\n"),
            vec![Block::Admonition {
                kind: "note".to_string(),
                body: vec![paragraph("Mind the gap.", 1)],
            }]
        );
    }

    #[test]
    fn test_image_directive_options() {
        assert_eq!(
            parse(".. image:: logo.png\n   :alt: Logo\n"),
            vec![Block::Image {
                uri: "logo.png".to_string(),
                alt: Some("Logo".to_string()),
            }]
        );
    }

    #[test]
    fn test_unknown_directive_is_error() {
        let err = parse_err(".. sparkle:: now\n");
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.diagnostic.message, "Unknown directive type \"sparkle\".");
    }

    #[test]
    fn test_unexpected_indentation_is_error() {
        let err = parse_err("line one\nline two\n    indented\n");
        assert_eq!(err.diagnostic.message, "Unexpected indentation.");
    }
}
