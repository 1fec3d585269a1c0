//! HTML output for parsed blocks.
//!
//! Markup mirrors what docutils emits, since downstream code locates
//! sections by `div.section` wrappers and heading tags.

use std::fmt::Write;

use crate::render::{RenderError, Reporter};
use crate::util::escape_html;

use super::blocks::{Block, DefinitionItem, Section};
use super::ids::Targets;
use super::inline::{Inline, parse_inline, to_html};

pub(crate) struct HtmlWriter<'a> {
    targets: &'a Targets,
    reporter: &'a mut Reporter,
    initial_level: usize,
    out: String,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(targets: &'a Targets, reporter: &'a mut Reporter, initial_level: u8) -> Self {
        Self {
            targets,
            reporter,
            initial_level: usize::from(initial_level),
            out: String::new(),
        }
    }

    /// Inline HTML for a title or other run of inline content.
    pub fn inline(&mut self, inlines: &[Inline], line: usize) -> Result<String, RenderError> {
        to_html(inlines, self.targets, line, self.reporter)
    }

    /// Write top-level blocks and return the HTML.
    pub fn finish(mut self, blocks: &[Block]) -> Result<String, RenderError> {
        self.blocks(blocks, 1)?;
        Ok(self.out)
    }

    fn blocks(&mut self, blocks: &[Block], depth: usize) -> Result<(), RenderError> {
        for block in blocks {
            self.block(block, depth)?;
        }
        Ok(())
    }

    fn paragraph_html(&mut self, text: &str, line: usize) -> Result<String, RenderError> {
        let inlines = parse_inline(text, line, self.reporter)?;
        self.inline(&inlines, line)
    }

    fn block(&mut self, block: &Block, depth: usize) -> Result<(), RenderError> {
        match block {
            Block::Section(section) => self.section(section, depth)?,
            Block::Paragraph { text, line } => {
                let html = self.paragraph_html(text, *line)?;
                writeln!(self.out, "<p>{html}</p>").unwrap();
            }
            Block::LiteralBlock { text, language } => {
                let class = match language {
                    Some(lang) => format!("code {} literal-block", escape_html(lang)),
                    None => "literal-block".to_string(),
                };
                writeln!(self.out, "<pre class=\"{class}\">{}</pre>", escape_html(text)).unwrap();
            }
            Block::BlockQuote(children) => {
                self.out.push_str("<blockquote>\n");
                self.blocks(children, depth)?;
                self.out.push_str("</blockquote>\n");
            }
            Block::BulletList(items) => self.list("ul", "simple", None, items, depth)?,
            Block::EnumeratedList { start, items } => {
                let start = (*start != 1).then_some(*start);
                self.list("ol", "arabic simple", start, items, depth)?;
            }
            Block::DefinitionList(items) => self.definition_list(items, depth)?,
            Block::Transition => self.out.push_str("<hr class=\"docutils\" />\n"),
            Block::Admonition { kind, body } => {
                let mut label = kind.clone();
                if let Some(first) = label.get_mut(..1) {
                    first.make_ascii_uppercase();
                }
                writeln!(self.out, "<div class=\"admonition {kind}\">").unwrap();
                writeln!(self.out, "<p class=\"admonition-title\">{label}</p>").unwrap();
                self.blocks(body, depth)?;
                self.out.push_str("</div>\n");
            }
            Block::Image { uri, alt } => {
                writeln!(
                    self.out,
                    "<img alt=\"{}\" src=\"{}\" />",
                    escape_html(alt.as_deref().unwrap_or(uri)),
                    escape_html(uri)
                )
                .unwrap();
            }
            Block::Target(target) => {
                if target.refuri.is_none() && !target.id.is_empty() {
                    writeln!(self.out, "<span id=\"{}\"></span>", escape_html(&target.id)).unwrap();
                }
            }
        }
        Ok(())
    }

    fn section(&mut self, section: &Section, depth: usize) -> Result<(), RenderError> {
        for extra in section.ids.iter().skip(1) {
            writeln!(self.out, "<span id=\"{}\"></span>", escape_html(extra)).unwrap();
        }
        let open = match section.ids.first() {
            Some(id) => format!("<div class=\"section\" id=\"{}\">", escape_html(id)),
            None => "<div class=\"section\">".to_string(),
        };
        writeln!(self.out, "{open}").unwrap();

        let level = (self.initial_level + depth - 1).min(6);
        let title = self.inline(&section.title, section.line)?;
        writeln!(self.out, "<h{level}>{title}</h{level}>").unwrap();

        self.blocks(&section.children, depth + 1)?;
        self.out.push_str("</div>\n");
        Ok(())
    }

    fn list(
        &mut self,
        tag: &str,
        class: &str,
        start: Option<usize>,
        items: &[Vec<Block>],
        depth: usize,
    ) -> Result<(), RenderError> {
        // Items holding a single paragraph are written without the <p>.
        let simple = items
            .iter()
            .all(|item| matches!(item.as_slice(), [] | [Block::Paragraph { .. }]));

        write!(self.out, "<{tag}").unwrap();
        if simple {
            write!(self.out, " class=\"{class}\"").unwrap();
        }
        if let Some(start) = start {
            write!(self.out, " start=\"{start}\"").unwrap();
        }
        self.out.push_str(">\n");

        for item in items {
            match item.as_slice() {
                [Block::Paragraph { text, line }] if simple => {
                    let html = self.paragraph_html(text, *line)?;
                    writeln!(self.out, "<li>{html}</li>").unwrap();
                }
                _ => {
                    self.out.push_str("<li>");
                    self.blocks(item, depth)?;
                    self.out.push_str("</li>\n");
                }
            }
        }

        writeln!(self.out, "</{tag}>").unwrap();
        Ok(())
    }

    fn definition_list(&mut self, items: &[DefinitionItem], depth: usize) -> Result<(), RenderError> {
        self.out.push_str("<dl class=\"docutils\">\n");
        for item in items {
            let term = self.paragraph_html(&item.term, item.line)?;
            writeln!(self.out, "<dt>{term}</dt>").unwrap();
            self.out.push_str("<dd>");
            self.blocks(&item.definition, depth)?;
            self.out.push_str("</dd>\n");
        }
        self.out.push_str("</dl>\n");
        Ok(())
    }
}
