//! Links and images.
//!
//! Bracketed inner content is parsed with nesting of the same kind
//! disallowed, then the destination is resolved by exactly one of the
//! four forms: inline `(dest "title")`, full reference `[label]`,
//! collapsed `[]`, or shortcut. Reference misses are reported with the
//! nearest defined labels.

use crate::ast::Inline;
use crate::error::ErrorKind;
use crate::lexing::CharType;
use crate::reference::normalize_label;
use crate::uri::Uri;

use super::{push_inline, InlineParser, Stop};

impl InlineParser<'_> {
    pub(crate) fn link(&mut self, out: &mut Vec<Inline>) {
        self.bracketed(false, out);
    }

    pub(crate) fn image(&mut self, out: &mut Vec<Inline>) {
        self.bracketed(true, out);
    }

    fn bracketed(&mut self, is_image: bool, out: &mut Vec<Inline>) {
        let snapshot = self.snapshot();
        if is_image {
            self.pos += 1;
        }
        debug_assert_eq!(self.peek(), Some('['));
        self.pos += 1;
        let inner_start = self.pos;

        let (saved_links, saved_images) = (self.links_disallowed, self.images_disallowed);
        if is_image {
            self.images_disallowed = true;
        } else {
            self.links_disallowed = true;
        }
        let inner = self.inline_seq(&Stop::Bracket);
        self.links_disallowed = saved_links;
        self.images_disallowed = saved_images;

        let inner = match inner {
            Ok(inner) => inner,
            Err(_) => {
                // No closing bracket; the marker is literal text.
                self.restore(snapshot);
                self.literal_marker(is_image, out);
                return;
            }
        };
        if inner.is_empty() && !is_image {
            self.restore(snapshot);
            self.literal_marker(is_image, out);
            return;
        }
        let inner = if inner.is_empty() {
            // `![]` keeps an explicitly empty alt sequence.
            vec![Inline::Plain(String::new())]
        } else {
            inner
        };
        let raw_label = self.text[inner_start..self.pos].to_string();
        self.pos += 1; // ']'
        self.last = CharType::Punct;

        match self.peek() {
            Some('(') => self.inline_destination(is_image, inner, out),
            Some('[') => {
                let label_offset = self.source_offset();
                match self.scan_reference_label() {
                    Some(label) if !label.trim().is_empty() => {
                        self.resolve_reference(is_image, inner, &label, label_offset, out)
                    }
                    Some(_) => {
                        // Collapsed `[]`: the inner text is the label.
                        self.resolve_reference(is_image, inner, &raw_label, label_offset, out)
                    }
                    None => {
                        let offset = self.source_offset() - raw_label.len() - 1;
                        self.resolve_reference(is_image, inner, &raw_label, offset, out)
                    }
                }
            }
            _ => {
                let offset = self.source_offset() - raw_label.len() - 1;
                self.resolve_reference(is_image, inner, &raw_label, offset, out)
            }
        }
    }

    fn literal_marker(&mut self, is_image: bool, out: &mut Vec<Inline>) {
        let marker = if is_image { "![" } else { "[" };
        self.pos += marker.len();
        self.last = CharType::Punct;
        push_inline(out, Inline::Plain(marker.to_string()));
    }

    /// `[label]` after the inner bracket; `None` when no closing bracket
    /// follows (shortcut resolution applies instead).
    fn scan_reference_label(&mut self) -> Option<String> {
        debug_assert_eq!(self.peek(), Some('['));
        let rest = &self.rest()[1..];
        let close = crate::block::find_unescaped(rest, ']')?;
        let label = rest[..close].to_string();
        self.pos += close + 2;
        self.last = CharType::Punct;
        Some(label)
    }

    /// Inline form: `(dest "title")` with optional wrapping whitespace.
    fn inline_destination(&mut self, is_image: bool, inner: Vec<Inline>, out: &mut Vec<Inline>) {
        debug_assert_eq!(self.peek(), Some('('));
        self.pos += 1;
        self.skip_destination_whitespace();

        let dest_offset = self.source_offset();
        let Some(dest_text) = self.scan_destination() else {
            return self.destination_error(dest_offset, inner, out);
        };
        let Ok(dest) = Uri::parse(&dest_text) else {
            return self.destination_error(dest_offset, inner, out);
        };

        self.skip_destination_whitespace();
        let title = self.scan_title();
        self.skip_destination_whitespace();
        if self.peek() != Some(')') {
            let offset = self.source_offset();
            return self.destination_error(offset, inner, out);
        }
        self.pos += 1;
        self.last = CharType::Punct;

        let node = if is_image {
            Inline::Image {
                alt: inner,
                src: dest,
                title,
            }
        } else {
            Inline::Link { inner, dest, title }
        };
        push_inline(out, node);
    }

    /// Spaces, tabs, and at most one newline.
    fn skip_destination_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
        if matches!(self.peek(), Some('\n') | Some('\r')) {
            self.pos += 1;
            if self.peek() == Some('\n') {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(' ') | Some('\t')) {
                self.pos += 1;
            }
        }
    }

    /// `<wrapped>` or a naked run up to whitespace or `)`.
    ///
    /// The angle form exists to permit spaces; the URI parser encodes
    /// them during validation.
    fn scan_destination(&mut self) -> Option<String> {
        match self.peek() {
            Some('<') => {
                let rest = self.rest();
                let close = rest.find('>')?;
                let dest = &rest[1..close];
                if dest.contains(['\n', '\r']) {
                    return None;
                }
                self.pos += close + 1;
                Some(dest.to_string())
            }
            Some(_) => {
                let rest = self.rest();
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == ')')
                    .unwrap_or(rest.len());
                if len == 0 {
                    return None;
                }
                self.pos += len;
                Some(rest[..len].to_string())
            }
            None => None,
        }
    }

    /// Optional `"…"`, `'…'`, or `(…)` title.
    fn scan_title(&mut self) -> Option<String> {
        let close = match self.peek() {
            Some('"') => '"',
            Some('\'') => '\'',
            Some('(') => ')',
            _ => return None,
        };
        let rest = &self.rest()[1..];
        let end = crate::block::find_unescaped(rest, close)?;
        let title = rest[..end].to_string();
        self.pos += end + 2;
        Some(title)
    }

    fn destination_error(&mut self, offset: usize, inner: Vec<Inline>, out: &mut Vec<Inline>) {
        self.report(
            offset,
            ErrorKind::Unexpected {
                found: "malformed link destination".to_string(),
                expected: "a URI, an optional title, and ')'".to_string(),
            },
        );
        // Resynchronize past the closing paren when it is in sight.
        if let Some(close) = self.rest().find(')') {
            self.pos += close + 1;
        }
        self.last = CharType::Punct;
        for inline in inner {
            push_inline(out, inline);
        }
    }

    /// Look the label up, or report the miss with suggestions.
    fn resolve_reference(
        &mut self,
        is_image: bool,
        inner: Vec<Inline>,
        label: &str,
        label_offset: usize,
        out: &mut Vec<Inline>,
    ) {
        match self.refs.lookup(label) {
            Some((dest, title)) => {
                let node = if is_image {
                    Inline::Image {
                        alt: inner,
                        src: dest.clone(),
                        title: title.clone(),
                    }
                } else {
                    Inline::Link {
                        inner,
                        dest: dest.clone(),
                        title: title.clone(),
                    }
                };
                push_inline(out, node);
            }
            None => {
                let nearest = self.refs.nearest(label);
                self.report(
                    label_offset,
                    ErrorKind::CouldNotFindReferenceDefinition {
                        label: normalize_label(label),
                        nearest,
                    },
                );
                for inline in inner {
                    push_inline(out, inline);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_inlines;
    use super::*;
    use crate::reference::ReferenceTable;

    fn refs() -> ReferenceTable {
        let mut table = ReferenceTable::new();
        table.insert("y", Uri::parse("/u").unwrap(), Some("t".to_string()));
        table.insert("img", Uri::parse("/pic.png").unwrap(), None);
        table
    }

    fn parse_with(text: &str, refs: &ReferenceTable) -> Vec<Inline> {
        parse_inlines(0, text, refs).unwrap().into_vec()
    }

    fn plain(s: &str) -> Inline {
        Inline::Plain(s.into())
    }

    #[test]
    fn inline_link_with_title() {
        let inlines = parse_with("[x](/u \"t\")", &ReferenceTable::new());
        assert_eq!(
            inlines,
            vec![Inline::Link {
                inner: vec![plain("x")],
                dest: Uri::parse("/u").unwrap(),
                title: Some("t".to_string()),
            }]
        );
    }

    #[test]
    fn inline_link_without_title() {
        let inlines = parse_with("[x](<my url>)", &ReferenceTable::new());
        match &inlines[0] {
            Inline::Link { dest, title, .. } => {
                assert_eq!(dest.as_str(), "my%20url");
                assert!(title.is_none());
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn full_reference_link() {
        let inlines = parse_with("[x][y]", &refs());
        assert_eq!(
            inlines,
            vec![Inline::Link {
                inner: vec![plain("x")],
                dest: Uri::parse("/u").unwrap(),
                title: Some("t".to_string()),
            }]
        );
    }

    #[test]
    fn collapsed_and_shortcut_references() {
        for text in ["[y][]", "[y]"] {
            let inlines = parse_with(text, &refs());
            match &inlines[0] {
                Inline::Link { dest, .. } => assert_eq!(dest.as_str(), "/u"),
                other => panic!("{text}: expected link, got {other:?}"),
            }
        }
    }

    #[test]
    fn unresolved_reference_suggests_labels() {
        let errors = parse_inlines(0, "[x][yy]", &refs()).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0].kind {
            ErrorKind::CouldNotFindReferenceDefinition { label, nearest } => {
                assert_eq!(label, "yy");
                assert_eq!(nearest[0], "y");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn nested_links_are_disallowed() {
        // The inner `[` is literal, so the bracketed content runs to the
        // first `]` and the first destination wins.
        let inlines = parse_with("[a [b](/inner) c](/outer)", &ReferenceTable::new());
        match &inlines[0] {
            Inline::Link { inner, dest, .. } => {
                assert_eq!(inner, &vec![plain("a [b")]);
                assert_eq!(dest.as_str(), "/inner");
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn image_with_alt() {
        let inlines = parse_with("![alt text](/pic.png)", &ReferenceTable::new());
        assert_eq!(
            inlines,
            vec![Inline::Image {
                alt: vec![plain("alt text")],
                src: Uri::parse("/pic.png").unwrap(),
                title: None,
            }]
        );
    }

    #[test]
    fn empty_alt_image() {
        let inlines = parse_with("![](/pic.png)", &ReferenceTable::new());
        assert_eq!(
            inlines,
            vec![Inline::Image {
                alt: vec![plain("")],
                src: Uri::parse("/pic.png").unwrap(),
                title: None,
            }]
        );
    }

    #[test]
    fn reference_image() {
        let inlines = parse_with("![logo][img]", &refs());
        match &inlines[0] {
            Inline::Image { src, .. } => assert_eq!(src.as_str(), "/pic.png"),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_bracket_is_literal() {
        let inlines = parse_with("[ not a link", &ReferenceTable::new());
        assert_eq!(inlines, vec![plain("[ not a link")]);
    }

    #[test]
    fn malformed_destination_reports() {
        let errors = parse_inlines(0, "[x](no closing", &ReferenceTable::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, ErrorKind::Unexpected { .. }));
    }
}
