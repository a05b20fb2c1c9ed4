//! Message body formatting for HTML-capable renderers.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#));

/// Sentence punctuation that ends a URL rather than belonging to it.
const URL_TRAILING: [char; 7] = ['.', ',', ';', ':', '!', '?', ')'];

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes `text`, turns bare `http(s)://` URLs into links and newlines into `<br>`.
///
/// URLs are found in the raw text, so escaped quotes and trailing punctuation
/// never end up inside an `href`.
pub fn format_message(text: &str) -> String {
    let linked = match URL_PATTERN.as_ref() {
        Ok(pattern) => linkify(text, pattern),
        Err(e) => {
            tracing::warn!("[Format] URL pattern unavailable: {}", e);
            escape_html(text)
        }
    };
    linked.replace('\n', "<br>")
}

fn linkify(text: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in pattern.find_iter(text) {
        let url = found.as_str().trim_end_matches(URL_TRAILING);
        out.push_str(&escape_html(&text[last..found.start()]));
        let href = escape_html(url);
        out.push_str(&format!(
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{href}</a>"#
        ));
        last = found.start() + url.len();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}
