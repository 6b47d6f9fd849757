//! Property tests for rendering and escaping.

use proptest::prelude::*;
use sternmark::{escape_html, header_id, parse, plain_text, Block};

proptest! {
    /// Same input, same HTML, every time.
    #[test]
    fn rendering_is_deterministic(input in "[ -~\n]{0,200}") {
        let first = parse("p.md", &input);
        let second = parse("p.md", &input);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a.render(), b.render()),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "parse outcome was not deterministic"),
        }
    }

    /// Escaped output never leaks the HTML metacharacters.
    #[test]
    fn escaping_removes_metacharacters(input in ".{0,200}") {
        let escaped = escape_html(&input);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
    }

    /// Escaping is reversible through the five entities it introduces.
    #[test]
    fn escaping_round_trips(input in ".{0,200}") {
        let escaped = escape_html(&input);
        let restored = escaped
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");
        prop_assert_eq!(restored, input);
    }

    /// Heading slugs are a fixed point of their own function.
    #[test]
    fn header_id_is_idempotent(input in ".{0,100}") {
        let once = header_id(&input);
        prop_assert_eq!(header_id(&once), once.clone());
        let all_valid_chars = once.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
        });
        prop_assert!(all_valid_chars);
    }

    /// For escape-only input, the parsed plain text is exactly the
    /// escaped characters.
    #[test]
    fn escapes_strip_to_their_characters(chars in proptest::collection::vec(
        prop::sample::select("!\"#$%&'*+,./:;<=>?@[]^_`{|}~".chars().collect::<Vec<_>>()),
        1..30,
    )) {
        let input: String = chars.iter().map(|c| format!("\\{c}")).collect();
        let expected: String = chars.iter().collect();
        let doc = parse("esc.md", &input).unwrap();
        match &doc.blocks()[0] {
            Block::Paragraph(inlines) => {
                prop_assert_eq!(plain_text(inlines.as_slice()), expected);
            }
            other => prop_assert!(false, "expected paragraph, got {:?}", other),
        }
    }

    /// Lists keep every item.
    #[test]
    fn lists_preserve_item_counts(n in 1usize..12) {
        let input: String = (0..n).map(|i| format!("- item{i}\n")).collect();
        let doc = parse("list.md", &input).unwrap();
        match &doc.blocks()[0] {
            Block::UnorderedList(items) => prop_assert_eq!(items.len(), n),
            other => prop_assert!(false, "expected list, got {:?}", other),
        }
    }
}
