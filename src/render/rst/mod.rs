//! reStructuredText renderer.
//!
//! Covers the subset of the language found in project READMEs: sections,
//! paragraphs, lists, literal and code blocks, block quotes, admonitions,
//! images, hyperlink targets, and the common inline markup.
//!
//! A lone top-level section becomes the document title. If the first thing
//! inside it is another section that is either alone or empty, that one
//! becomes the subtitle.

mod blocks;
mod ids;
mod inline;
mod writer;

use tracing::debug;

use crate::util::strip_bom;

use self::blocks::{Block, Section};
use self::ids::{IdRegistry, Targets, make_id};
use self::inline::to_text;
use self::writer::HtmlWriter;

use super::{Document, MarkupRenderer, RenderConfig, RenderError, Reporter};

/// The bundled reStructuredText engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RstRenderer;

impl MarkupRenderer for RstRenderer {
    fn render(&self, source: &str, config: &RenderConfig) -> Result<Document, RenderError> {
        let mut reporter = Reporter::new(config);
        let blocks = blocks::parse_document(strip_bom(source), &mut reporter)?;

        let (title, blocks) = promote(blocks);
        let (subtitle, mut body) = match title {
            Some(_) => promote_subtitle(blocks),
            None => (None, blocks),
        };

        let targets = assign_ids(&mut body);

        let mut writer = HtmlWriter::new(&targets, &mut reporter, config.initial_header_level);
        let title = match &title {
            Some(section) => writer.inline(&section.title, section.line)?,
            None => String::new(),
        };
        let subtitle = match &subtitle {
            Some(section) => writer.inline(&section.title, section.line)?,
            None => String::new(),
        };
        let body = writer.finish(&body)?;

        debug!(
            title = %title,
            diagnostics = reporter.diagnostics().len(),
            bytes = body.len(),
            "rendered reStructuredText"
        );

        Ok(Document {
            title,
            subtitle,
            body,
        })
    }
}

/// Lift the only visible top-level section out as the title.
fn promote(blocks: Vec<Block>) -> (Option<Section>, Vec<Block>) {
    let visible: Vec<usize> = visible_indices(&blocks);
    match visible[..] {
        [idx] if matches!(blocks[idx], Block::Section(_)) => lift(blocks, idx),
        _ => (None, blocks),
    }
}

/// After title promotion: the first visible block becomes the subtitle when
/// it is a section that is alone or has nothing but targets inside.
fn promote_subtitle(blocks: Vec<Block>) -> (Option<Section>, Vec<Block>) {
    let visible = visible_indices(&blocks);
    let Some(&first) = visible.first() else {
        return (None, blocks);
    };
    let eligible = match &blocks[first] {
        Block::Section(section) => {
            visible.len() == 1 || section.children.iter().all(Block::is_invisible)
        }
        _ => false,
    };
    if eligible {
        lift(blocks, first)
    } else {
        (None, blocks)
    }
}

fn visible_indices(blocks: &[Block]) -> Vec<usize> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.is_invisible())
        .map(|(i, _)| i)
        .collect()
}

/// Remove the section at `idx`, splicing its children into its place.
fn lift(mut blocks: Vec<Block>, idx: usize) -> (Option<Section>, Vec<Block>) {
    let Block::Section(mut section) = blocks.remove(idx) else {
        return (None, blocks);
    };
    let children = std::mem::take(&mut section.children);
    blocks.splice(idx..idx, children);
    (Some(section), blocks)
}

/// Give sections and internal targets unique ids and collect every
/// reference name. Explicit names take precedence over section titles.
fn assign_ids(blocks: &mut [Block]) -> Targets {
    let mut ids = IdRegistry::default();
    let mut targets = Targets::default();
    let mut implicit = Vec::new();
    walk(blocks, &mut ids, &mut targets, &mut implicit);
    for (name, href) in implicit {
        targets.insert(&name, href);
    }
    targets
}

fn walk(
    blocks: &mut [Block],
    ids: &mut IdRegistry,
    targets: &mut Targets,
    implicit: &mut Vec<(String, String)>,
) {
    for block in blocks {
        match block {
            Block::Section(section) => {
                for name in &section.names {
                    let id = ids.claim(&make_id(name));
                    targets.insert(name, format!("#{id}"));
                    section.ids.push(id);
                }
                let text = to_text(&section.title);
                let id = ids.claim(&make_id(&text));
                implicit.push((text, format!("#{id}")));
                section.ids.push(id);
                walk(&mut section.children, ids, targets, implicit);
            }
            Block::Target(target) => match &target.refuri {
                Some(uri) => targets.insert(&target.name, uri.clone()),
                None => {
                    target.id = ids.claim(&make_id(&target.name));
                    targets.insert(&target.name, format!("#{}", target.id));
                }
            },
            Block::BlockQuote(children) | Block::Admonition { body: children, .. } => {
                walk(children, ids, targets, implicit);
            }
            Block::BulletList(items) | Block::EnumeratedList { items, .. } => {
                for item in items {
                    walk(item, ids, targets, implicit);
                }
            }
            Block::DefinitionList(items) => {
                for item in items {
                    walk(&mut item.definition, ids, targets, implicit);
                }
            }
            Block::Paragraph { .. }
            | Block::LiteralBlock { .. }
            | Block::Transition
            | Block::Image { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Severity;

    fn render(src: &str) -> Document {
        RstRenderer.render(src, &RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_title_and_subtitle_promotion() {
        let doc = render("=====\nTitle\n=====\n\nSubtitle\n--------\n\nIntro text.\n");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.subtitle, "Subtitle");
        assert_eq!(doc.body, "<p>Intro text.</p>\n");
    }

    #[test]
    fn test_empty_subtitle_section_is_dropped() {
        let doc = render("Title\n=====\n\nSubtitle\n--------\n\nUsage\n-----\n\nRun it.\n");
        assert_eq!(doc.subtitle, "Subtitle");
        assert_eq!(
            doc.body,
            "<div class=\"section\" id=\"usage\">\n<h2>Usage</h2>\n<p>Run it.</p>\n</div>\n"
        );
    }

    #[test]
    fn test_no_title_when_several_top_sections() {
        let doc = render("One\n===\n\na\n\nTwo\n===\n\nb\n");
        assert_eq!(doc.title, "");
        assert!(doc.body.starts_with("<div class=\"section\" id=\"one\">\n<h2>One</h2>"));
    }

    #[test]
    fn test_first_section_with_content_is_not_subtitle() {
        let doc = render("Title\n=====\n\nUsage\n-----\n\nRun it.\n\nMore\n----\n\nText.\n");
        assert_eq!(doc.subtitle, "");
        assert!(doc.body.contains("<h2>Usage</h2>"));
        assert!(doc.body.contains("<h2>More</h2>"));
    }

    #[test]
    fn test_explicit_target_adds_span_and_wins_reference() {
        let doc = render(
            "Title\n=====\n\nIntro, see features-short_.\n\n.. _features-short:\n\n\
             Short Features\n--------------\n\nx\n",
        );
        assert!(doc.body.contains("href=\"#features-short\""));
        assert!(doc.body.contains(
            "<span id=\"short-features\"></span>\n<div class=\"section\" id=\"features-short\">"
        ));
    }

    #[test]
    fn test_duplicate_titles_get_suffixed_ids() {
        let doc = render("A\n=\n\nx\n\nA\n=\n\ny\n");
        assert!(doc.body.contains("id=\"a\""));
        assert!(doc.body.contains("id=\"a-1\""));
    }

    #[test]
    fn test_section_reference_resolves() {
        let doc = render("One\n===\n\nSee `Two`_.\n\nTwo\n===\n\nb\n");
        assert!(doc.body.contains("<a class=\"reference internal\" href=\"#two\">Two</a>"));
    }

    #[test]
    fn test_external_target_reference() {
        let doc = render("Read the docs_.\n\n.. _docs: https://example.com/\n");
        assert_eq!(
            doc.body,
            "<p>Read the <a class=\"reference external\" href=\"https://example.com/\">docs</a>.</p>\n"
        );
    }

    #[test]
    fn test_initial_header_level() {
        let config = RenderConfig::default().with_initial_header_level(1);
        let doc = RstRenderer.render("A\n=\n\na\n\nB\n=\n\nb\n", &config).unwrap();
        assert!(doc.body.contains("<h1>A</h1>"));
    }

    #[test]
    fn test_halt_level_controls_warnings() {
        let src = "Installation\n=======\n\ntext\n";
        let err = RstRenderer.render(src, &RenderConfig::default()).unwrap_err();
        assert_eq!(err.severity(), Severity::Warning);

        let relaxed = RenderConfig::default().with_halt_level(Severity::Error);
        let doc = RstRenderer.render(src, &relaxed).unwrap();
        assert_eq!(doc.title, "Installation");
    }

    #[test]
    fn test_bom_is_ignored() {
        let doc = render("\u{feff}Title\n=====\n\nbody\n");
        assert_eq!(doc.title, "Title");
    }
}
