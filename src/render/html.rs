//! The HTML accumulator.
//!
//! A thin append-only wrapper over `String`; renderers build fragments
//! with raw tag pieces and escaped text, and extension hooks receive and
//! return whole `Html` values.

use std::fmt;

/// An HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Html(String);

impl Html {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-rendered fragment.
    pub fn raw(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn push_raw(&mut self, fragment: &str) {
        self.0.push_str(fragment);
    }

    pub fn push_html(&mut self, fragment: &Html) {
        self.0.push_str(&fragment.0);
    }

    /// Append text, escaping the five HTML metacharacters.
    pub fn push_escaped(&mut self, text: &str) {
        push_escaped_into(&mut self.0, text);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape text for element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped_into(&mut out, text);
    out
}

fn push_escaped_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_covers_metacharacters() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn html_builds_incrementally() {
        let mut html = Html::new();
        html.push_raw("<p>");
        html.push_escaped("a < b");
        html.push_raw("</p>");
        assert_eq!(html.as_str(), "<p>a &lt; b</p>");
    }
}
