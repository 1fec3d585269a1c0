//! Complete HTML page output.
//!
//! [`render_page`] lays out [`PageContent`] as a landing page: a header with
//! the title and subtitle, the short features side by side, then the rest of
//! the document. [`write_site`] writes that page as `index.html` for static
//! hosting.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::transform::PageContent;
use crate::util::strip_tags;

const STYLE: &str = "\
body { margin: 0 auto; max-width: 60em; padding: 0 1em; font-family: sans-serif; line-height: 1.5; }
header { text-align: center; padding: 2em 0 1em; }
header .subtitle { font-size: 1.25em; color: #555; }
.features-short { display: flex; gap: 2em; }
.features-short .feature { flex: 1; }
";

/// Lay out page content as a full HTML5 document.
pub fn render_page(content: &PageContent) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    writeln!(out, "<title>{}</title>", strip_tags(&content.title)).unwrap();
    writeln!(out, "<style>\n{STYLE}</style>").unwrap();
    out.push_str("</head>\n<body>\n");

    out.push_str("<header>\n");
    writeln!(out, "<h1>{}</h1>", content.title).unwrap();
    if !content.subtitle.is_empty() {
        writeln!(out, "<p class=\"subtitle\">{}</p>", content.subtitle).unwrap();
    }
    out.push_str("</header>\n");

    if !content.features_short.is_empty() {
        out.push_str("<section class=\"features-short\">\n");
        for feature in &content.features_short {
            out.push_str("<div class=\"feature\">\n");
            writeln!(out, "<h3>{}</h3>", feature.title).unwrap();
            writeln!(out, "{}", feature.body).unwrap();
            out.push_str("</div>\n");
        }
        out.push_str("</section>\n");
    }

    writeln!(out, "<main>\n{}\n</main>", content.body).unwrap();
    out.push_str("</body>\n</html>\n");
    out
}

/// Write the page to `dir/index.html`, creating `dir` if needed.
///
/// Returns the path of the written file.
pub fn write_site(content: &PageContent, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join("index.html");
    fs::write(&path, render_page(content))?;
    info!(path = %path.display(), "wrote page");
    Ok(path)
}
