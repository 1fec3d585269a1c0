//! Page transformation pipeline.
//!
//! Render markup to HTML, parse it into an
//! [`ArenaDom`](crate::dom::ArenaDom), flatten the section wrappers, pull the
//! short-features region out as structured [`Feature`]s, and serialize what
//! is left as the page body.
//!
//! Each call builds and discards its own tree, so a [`Transformer`] can be
//! shared freely between threads when its engines can.
//!
//! # Example
//!
//! ```
//! use rstpage::transform_document;
//!
//! let source = "\
//! Project
//! =======
//!
//! A small project.
//!
//! Short Features
//! --------------
//!
//! Fast
//! ~~~~
//!
//! Quick.
//!
//! Small
//! ~~~~~
//!
//! Tiny.
//!
//! Safe
//! ~~~~
//!
//! Sound.
//! ";
//!
//! let page = transform_document(source).unwrap();
//! assert_eq!(page.title, "Project");
//! assert_eq!(page.features_short[1].title, "Small");
//! assert_eq!(page.features_short[2].body, "<p>Sound.</p>");
//! ```

mod extract;
mod features;
mod flatten;

pub use extract::extract_section;
pub use flatten::{SECTION_CLASS, flatten_sections, is_section_wrapper};

use tracing::debug;

use crate::dom::{Html5everParser, HtmlParser};
use crate::error::{Error, Result};
use crate::render::{Document, MarkupRenderer, RenderConfig, RstRenderer};

/// Identifiers that mark the short-features region, in priority order.
pub const DEFAULT_ANCHOR_IDS: &[&str] = &["features-short", "short-features"];

/// Number of short features the page layout expects.
pub const DEFAULT_FEATURE_COUNT: usize = 3;

/// One short feature blurb.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Inner HTML of the feature heading.
    pub title: String,
    /// HTML of everything after the heading.
    pub body: String,
}

/// Structured page content produced by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageContent {
    pub title: String,
    pub subtitle: String,
    pub features_short: Vec<Feature>,
    /// The remaining document as an HTML fragment.
    pub body: String,
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub render: RenderConfig,
    pub anchor_ids: Vec<String>,
    pub feature_count: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            anchor_ids: DEFAULT_ANCHOR_IDS.iter().map(|s| s.to_string()).collect(),
            feature_count: DEFAULT_FEATURE_COUNT,
        }
    }
}

impl TransformOptions {
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// Replace the anchor identifiers; they are tried in the given order.
    pub fn with_anchor_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.anchor_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_feature_count(mut self, count: usize) -> Self {
        self.feature_count = count;
        self
    }
}

/// Runs the full pipeline with an injected renderer and HTML parser.
#[derive(Debug, Clone, Default)]
pub struct Transformer<R = RstRenderer, P = Html5everParser> {
    renderer: R,
    parser: P,
    options: TransformOptions,
}

impl<R: MarkupRenderer, P: HtmlParser> Transformer<R, P> {
    pub fn new(renderer: R, parser: P) -> Self {
        Self {
            renderer,
            parser,
            options: TransformOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Render `source` and restructure it into [`PageContent`].
    pub fn transform(&self, source: &str) -> Result<PageContent> {
        let document = self.renderer.render(source, &self.options.render)?;
        debug!(
            title = %document.title,
            bytes = document.body.len(),
            "rendered document"
        );
        self.transform_rendered(document)
    }

    /// Restructure an already rendered [`Document`].
    pub fn transform_rendered(&self, document: Document) -> Result<PageContent> {
        let mut dom = self.parser.parse(&document.body)?;
        let body = dom
            .find_by_tag("body")
            .ok_or_else(|| Error::Structure("parsed HTML has no <body> element".to_string()))?;

        let flattened = flatten_sections(&mut dom, body);
        debug!(wrappers = flattened, "flattened sections");

        let features = features::extract_features(&mut dom, body, &self.options.anchor_ids)?;
        if features.len() != self.options.feature_count {
            return Err(Error::Structure(format!(
                "expected {} short features, found {}",
                self.options.feature_count,
                features.len()
            )));
        }
        debug!(count = features.len(), "extracted short features");

        Ok(PageContent {
            title: document.title,
            subtitle: document.subtitle,
            features_short: features,
            body: dom.inner_html(body).trim().to_string(),
        })
    }
}

/// Run the default pipeline: bundled reStructuredText renderer, html5ever
/// parser, default options.
pub fn transform_document(source: &str) -> Result<PageContent> {
    let transformer: Transformer = Transformer::default();
    transformer.transform(source)
}
