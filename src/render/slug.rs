//! Heading anchors.

/// Derive the `id` attribute for a heading from its plain text: Unicode
/// lowercase, trimmed, whitespace runs become single hyphens, and
/// anything outside `[a-z0-9-_]` is dropped.
pub fn header_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.trim().chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        if in_whitespace {
            out.push('-');
            in_whitespace = false;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_' {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(header_id("Hello World"), "hello-world");
        assert_eq!(header_id("Hi"), "hi");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(header_id("What's New?"), "whats-new");
        assert_eq!(header_id("a_b-c"), "a_b-c");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(header_id("  a   b  "), "a-b");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let once = header_id("Some Heading Title!");
        assert_eq!(header_id(&once), once);
    }

    #[test]
    fn unicode_lowercases_before_filtering() {
        // Characters outside the slug alphabet vanish even after folding.
        assert_eq!(header_id("Grüße 123"), "gre-123");
    }
}
