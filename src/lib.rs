//! # rstpage
//!
//! Turn a reStructuredText project README into landing-page content.
//!
//! ## Features
//!
//! - Render a practical subset of reStructuredText to docutils-style HTML
//! - Flatten `<div class="section">` wrappers so headings carry the ids
//! - Extract the "short features" section into structured [`Feature`]s
//! - Serialize the rest of the document as an embeddable fragment
//!
//! ## Quick Start
//!
//! ```no_run
//! use rstpage::{page, transform_document};
//!
//! let source = std::fs::read_to_string("README.rst").unwrap();
//! let content = transform_document(&source).unwrap();
//! page::write_site(&content, "site").unwrap();
//! ```
//!
//! ## Pipeline
//!
//! Every stage is swappable. The [`Transformer`] takes any
//! [`MarkupRenderer`](render::MarkupRenderer) and
//! [`HtmlParser`](dom::HtmlParser):
//!
//! ```
//! use rstpage::dom::Html5everParser;
//! use rstpage::render::{RenderConfig, RstRenderer, Severity};
//! use rstpage::{TransformOptions, Transformer};
//!
//! let options = TransformOptions::default()
//!     .with_render(RenderConfig::default().with_halt_level(Severity::Error))
//!     .with_anchor_ids(["highlights"]);
//! let transformer = Transformer::new(RstRenderer, Html5everParser).with_options(options);
//! assert_eq!(transformer.options().feature_count, 3);
//! ```

pub mod dom;
pub mod error;
pub mod page;
pub mod render;
pub mod transform;
pub(crate) mod util;

pub use error::{Error, Result};
pub use render::{Document, MarkupRenderer, RenderConfig, RenderError, RstRenderer, Severity};
pub use transform::{
    Feature, PageContent, TransformOptions, Transformer, extract_section, flatten_sections,
    transform_document,
};
