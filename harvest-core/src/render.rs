//! HTML-to-markdown rendering seam.
//!
//! The extraction engine treats response rendering as an opaque pure
//! function `html -> markdown`; the trait keeps the converter swappable
//! and lets tests substitute a deterministic stub.

/// Converts a recovered HTML response body into markdown text.
pub trait ResponseRenderer: Send + Sync {
    fn render(&self, html: &str) -> String;
}

/// Default renderer backed by `html2md`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl ResponseRenderer for MarkdownRenderer {
    fn render(&self, html: &str) -> String {
        html2md::parse_html(html).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_basic_markup() {
        let renderer = MarkdownRenderer;
        let markdown = renderer.render("<p>Hello <strong>world</strong></p>");
        assert!(markdown.contains("Hello"));
        assert!(markdown.contains("**world**"));
    }

    #[test]
    fn test_plain_text_passes_through() {
        let renderer = MarkdownRenderer;
        assert_eq!(renderer.render("just text"), "just text");
    }
}
