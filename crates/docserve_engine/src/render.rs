//! Markdown rendering and the HTML page templates for the web frontend.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pulldown_cmark::{Options, Parser, html};

/// Characters percent-encoded when a document name is placed in a link.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'{')
    .add(b'}');

const STYLE: &str = "body { font-family: sans-serif; max-width: 52rem; margin: 2rem auto; \
                     padding: 0 1rem; line-height: 1.5; } \
                     pre, code { background: #f4f4f4; } \
                     pre { padding: 1rem; overflow-x: auto; }";

/// Convert Markdown to an HTML fragment.
///
/// No caching happens here; callers re-render on every request so the page
/// always reflects the current file contents.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// The page for a single rendered document.
pub fn document_page(title: &str, body_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n\
         <p><a href=\"/\">&larr; all documents</a></p>\n{body_html}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// The index page listing all document names.
pub fn index_page(title: &str, names: &[String]) -> String {
    let mut items = String::new();
    for name in names {
        let href = utf8_percent_encode(name, PATH_SEGMENT);
        items.push_str(&format!(
            "<li><a href=\"/docs/{href}\">{name}</a></li>\n",
            name = escape_html(name),
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <ul>\n{items}</ul>\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Minimal HTML escaping for text interpolated into the templates.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
