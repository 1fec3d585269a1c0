//! Markup rendering.
//!
//! A [`MarkupRenderer`] turns lightweight-markup source into an HTML body plus
//! the document title and subtitle. The pipeline only depends on the trait;
//! [`RstRenderer`] is the bundled reStructuredText engine.
//!
//! Rendering is all or nothing: the first diagnostic at or above
//! [`RenderConfig::halt_level`] aborts with a [`RenderError`]. Less serious
//! diagnostics are logged and rendering continues.
//!
//! # Example
//!
//! ```
//! use rstpage::render::{MarkupRenderer, RenderConfig, RstRenderer};
//!
//! let doc = RstRenderer
//!     .render("Hello\n=====\n\nWorld.", &RenderConfig::default())
//!     .unwrap();
//! assert_eq!(doc.title, "Hello");
//! assert_eq!(doc.body, "<p>World.</p>\n");
//! ```

mod diagnostic;
mod rst;

pub use diagnostic::{Diagnostic, RenderError, Severity};
pub use rst::RstRenderer;

pub(crate) use diagnostic::Reporter;

/// Settings fixed for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Attach the diagnostics that preceded a failure to the [`RenderError`].
    pub traceback: bool,
    /// Lowest severity that aborts rendering.
    pub halt_level: Severity,
    /// Heading level (1-6) used for top-level sections.
    pub initial_header_level: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            traceback: true,
            halt_level: Severity::Warning,
            initial_header_level: 2,
        }
    }
}

impl RenderConfig {
    pub fn with_traceback(mut self, traceback: bool) -> Self {
        self.traceback = traceback;
        self
    }

    pub fn with_halt_level(mut self, halt_level: Severity) -> Self {
        self.halt_level = halt_level;
        self
    }

    /// Set the top-level heading level, clamped to 1..=6.
    pub fn with_initial_header_level(mut self, level: u8) -> Self {
        self.initial_header_level = level.clamp(1, 6);
        self
    }
}

/// Rendered markup: title metadata and the HTML body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Inline HTML of the document title.
    pub title: String,
    /// Inline HTML of the subtitle, empty when there is none.
    pub subtitle: String,
    /// HTML for everything below the title.
    pub body: String,
}

/// Converts markup source into a [`Document`].
///
/// Implementations must be deterministic for a fixed source and config.
pub trait MarkupRenderer {
    fn render(&self, source: &str, config: &RenderConfig) -> Result<Document, RenderError>;
}

impl<R: MarkupRenderer + ?Sized> MarkupRenderer for &R {
    fn render(&self, source: &str, config: &RenderConfig) -> Result<Document, RenderError> {
        (**self).render(source, config)
    }
}
