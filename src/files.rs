//! Saving, exporting and opening documents.
//!
//! A "download" is a named file body plus its MIME type; the app writes it
//! into the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MARKDOWN_MIME: &str = "text/markdown";
pub const HTML_MIME: &str = "text/html";
pub const HTML_FILE_NAME: &str = "document.html";

const KATEX_BASE: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.8/dist";

const EXPORT_STYLE: &str = "\
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans KR', sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 2rem;
        }
        table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
        th, td { border: 1px solid #ddd; padding: 8px 12px; text-align: left; }
        th { background: #f5f5f5; }
        pre { background: #f5f5f5; padding: 1rem; border-radius: 4px; overflow-x: auto; }
        code { background: #f5f5f5; padding: 2px 4px; border-radius: 3px; }
        blockquote { border-left: 4px solid #007AFF; padding-left: 1rem; margin: 1rem 0; }";

const RENDER_MATH_SCRIPT: &str = "\
renderMathInElement(document.body, {
    delimiters: [
        {left: '$$', right: '$$', display: true},
        {left: '$', right: '$', display: false},
        {left: '\\\\[', right: '\\\\]', display: true},
        {left: '\\\\(', right: '\\\\)', display: false}
    ],
    throwOnError: false
});";

static MATH_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<span data-math-style="(inline|display)">(.*?)</span>"#)
        .expect("math span pattern is valid")
});

/// A file ready to be written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub body: String,
}

impl Download {
    /// Write the body into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = self.body.len(), "download written");
        Ok(path)
    }
}

/// The markdown source as `document_YYYY-MM-DD.md`.
pub fn markdown_download(content: &str, date: NaiveDate) -> Download {
    Download {
        file_name: format!("document_{}.md", date.format("%Y-%m-%d")),
        mime: MARKDOWN_MIME,
        body: content.to_string(),
    }
}

/// A standalone HTML page with KaTeX wired up for `$…$` / `$$…$$` math.
pub fn html_export(content: &str) -> Download {
    let _scope = crate::perf::scope("files.html_export");
    let mut options = Options::default();
    crate::document::enable_extensions(&mut options);
    options.render.unsafe_ = true;

    let source = crate::document::math::normalize_delimiters(content);
    let rendered = markdown_to_html(&source, &options);
    // KaTeX auto-render scans text for the delimiters, so put them back.
    let html = MATH_SPAN.replace_all(&rendered, |caps: &regex::Captures<'_>| {
        let delimiter = if &caps[1] == "display" { "$$" } else { "$" };
        format!("{delimiter}{}{delimiter}", &caps[2])
    });

    let body = format!(
        "<!DOCTYPE html>
<html lang=\"ko\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>한글다운 문서</title>
    <link rel=\"stylesheet\" href=\"{KATEX_BASE}/katex.min.css\">
    <style>
{EXPORT_STYLE}
    </style>
</head>
<body>
{html}
<script src=\"{KATEX_BASE}/katex.min.js\"></script>
<script src=\"{KATEX_BASE}/contrib/auto-render.min.js\"></script>
<script>
{RENDER_MATH_SCRIPT}
</script>
</body>
</html>
"
    );

    Download {
        file_name: HTML_FILE_NAME.to_string(),
        mime: HTML_MIME,
        body,
    }
}

/// Read a text file as-is. Invalid UTF-8 is replaced rather than rejected.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
