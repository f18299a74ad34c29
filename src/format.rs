//! Rendering of recognized text as a minimal HTML document.
//!
//! One `<p>` element per paragraph, where paragraphs are separated by
//! blank lines in the recognized text. Paragraph content is inserted
//! verbatim; HTML-significant characters are not escaped.

use regex::Regex;
use std::sync::LazyLock;

// A blank line is a newline, optional whitespace, another newline. The
// \s* also swallows extra newlines, so longer blank runs count as one
// separator.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern"));

/// Wrap each paragraph of `text` in a `<p>` element inside a bare
/// `<html><body>` document. Newlines within a paragraph are flattened
/// to single spaces.
///
/// Empty input (after trimming) still yields one empty `<p></p>`.
pub fn to_html(text: &str) -> String {
    let mut html = String::from("<html>\n<body>\n");
    for paragraph in PARAGRAPH_BREAK.split(text.trim()) {
        let flat = paragraph.replace('\n', " ");
        html.push_str("<p>");
        html.push_str(&flat);
        html.push_str("</p>\n");
    }
    html.push_str("</body>\n</html>");
    html
}

/// Number of paragraphs `to_html` would emit for `text`.
pub fn count_paragraphs(text: &str) -> usize {
    PARAGRAPH_BREAK.split(text.trim()).count()
}
