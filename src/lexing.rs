//! Character-level utilities shared by both parser phases.
//!
//! Character classes, backslash escapes, HTML entity and numeric character
//! references, and the whitespace collapse used by code spans and reference
//! labels all live here, so the block and inline parsers never hardcode a
//! character set inline.

use std::collections::HashMap;

use entities::ENTITIES;
use once_cell::sync::Lazy;
use unicode_categories::UnicodeCategories;

use crate::error::ErrorKind;

/// Classification of the character to the left or right of a delimiter run.
///
/// The derived ordering (`Space < Punct < Other`) is what the flanking
/// rules compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CharType {
    Space,
    Punct,
    Other,
}

/// Classify a character for flanking decisions.
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Space
    } else if is_ascii_punct(ch) || ch.is_punctuation() || ch.is_symbol() {
        CharType::Punct
    } else {
        CharType::Other
    }
}

/// Space or tab.
pub fn is_space_char(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

pub fn is_newline_char(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

pub fn is_space_or_newline(ch: char) -> bool {
    is_space_char(ch) || is_newline_char(ch)
}

/// A character that can open or close an inline frame.
pub fn is_frame_char(ch: char) -> bool {
    matches!(ch, '*' | '^' | '_' | '~')
}

/// A character with inline markup meaning.
pub fn is_markup_char(ch: char) -> bool {
    is_frame_char(ch) || matches!(ch, '[' | ']' | '`')
}

/// A character the plain-run scanner must stop at.
pub fn is_special_char(ch: char) -> bool {
    is_markup_char(ch) || matches!(ch, '\\' | '!' | '<')
}

/// ASCII punctuation per the ranges `!-/`, `:-@`, `` [-` ``, `{-~`.
pub fn is_ascii_punct(ch: char) -> bool {
    matches!(ch, '!'..='/' | ':'..='@' | '['..='`' | '{'..='~')
}

/// Result of scanning the input at a `&`.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityScan {
    /// A well-formed reference; `len` bytes decode to `text`.
    Decoded { text: String, len: usize },
    /// Not entity-shaped at all; the `&` is a literal ampersand.
    Literal,
    /// Entity-shaped but invalid; `len` bytes should be skipped during
    /// recovery.
    Invalid { kind: ErrorKind, len: usize },
}

/// Named entities, keyed without the surrounding `&`/`;`.
///
/// The HTML5 table also carries legacy semicolon-less forms; only the
/// canonical semicolon-terminated names are resolvable here.
static ENTITY_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    ENTITIES
        .iter()
        .filter(|e| e.entity.ends_with(';'))
        .map(|e| (&e.entity[1..e.entity.len() - 1], e.characters))
        .collect()
});

/// Scan an entity or numeric character reference.
///
/// `input` must begin with `&`. Decimal (`&#35;`) and hex (`&#x23;`)
/// references reject zero and anything beyond U+10FFFF (including the
/// surrogate range) as `InvalidNumericCharacter`; a well-shaped `&name;`
/// with an unknown name is `UnknownHtmlEntityName`. Anything else leaves
/// the ampersand literal.
pub fn scan_entity(input: &str) -> EntityScan {
    debug_assert!(input.starts_with('&'));
    let bytes = input.as_bytes();

    if bytes.get(1) == Some(&b'#') {
        return scan_numeric_reference(input);
    }

    let mut end = 1;
    while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
        end += 1;
    }
    if end == 1 || bytes.get(end) != Some(&b';') {
        return EntityScan::Literal;
    }
    let name = &input[1..end];
    match ENTITY_MAP.get(name) {
        Some(characters) => EntityScan::Decoded {
            text: (*characters).to_string(),
            len: end + 1,
        },
        None => EntityScan::Invalid {
            kind: ErrorKind::UnknownHtmlEntityName(name.to_string()),
            len: end + 1,
        },
    }
}

fn scan_numeric_reference(input: &str) -> EntityScan {
    let bytes = input.as_bytes();
    let (digits_start, radix): (usize, u32) = match bytes.get(2) {
        Some(&b'x') | Some(&b'X') => (3, 16),
        _ => (2, 10),
    };

    let mut end = digits_start;
    let mut value: u64 = 0;
    while end < bytes.len() {
        let Some(digit) = (bytes[end] as char).to_digit(radix) else {
            break;
        };
        // Saturate well past the Unicode ceiling so long inputs still
        // report InvalidNumericCharacter rather than wrapping.
        value = (value * u64::from(radix) + u64::from(digit)).min(u64::from(u32::MAX));
        end += 1;
    }
    if end == digits_start || bytes.get(end) != Some(&b';') {
        return EntityScan::Literal;
    }

    let len = end + 1;
    let code_point = value as u32;
    match char::from_u32(code_point) {
        Some(ch) if code_point != 0 => EntityScan::Decoded {
            text: ch.to_string(),
            len,
        },
        _ => EntityScan::Invalid {
            kind: ErrorKind::InvalidNumericCharacter(code_point),
            len,
        },
    }
}

/// `\` followed by ASCII punctuation yields the literal character.
///
/// `input` must begin with the backslash. Returns the escaped character and
/// the bytes consumed, or `None` when the sequence is not an escape (the
/// backslash itself is then literal).
pub fn scan_escape(input: &str) -> Option<(char, usize)> {
    debug_assert!(input.starts_with('\\'));
    let next = input[1..].chars().next()?;
    if is_ascii_punct(next) {
        Some((next, 1 + next.len_utf8()))
    } else {
        None
    }
}

/// Collapse each run of whitespace to a single space and trim both ends.
///
/// Used for code-span content and reference-label normalization.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
