//! YAML front matter.
//!
//! A document may open with a `---` fence pair whose body is handed to
//! `serde_yaml`. A decoder failure is recorded (with the decoder's own
//! offset folded in) and parsing continues with no YAML value; a fence
//! pair that never closes is not front matter at all, and the opening
//! `---` is left for the block parser to read as a thematic break.

use log::debug;

use crate::error::{ErrorKind, ParseError};

use super::BlockParser;

impl BlockParser<'_> {
    pub(crate) fn parse_front_matter(&mut self) -> Option<serde_yaml::Value> {
        debug_assert_eq!(self.pos, 0);
        let first = self.current_line();
        if first.starts_with([' ', '\t']) || first.trim_end() != "---" {
            return None;
        }

        let body_start = self.after_newline(self.line_end(0));
        let mut cursor = body_start;
        let (body_end, after_close) = loop {
            if cursor >= self.src.len() {
                // Never closed; not front matter.
                return None;
            }
            let end = self.line_end(cursor);
            if self.src[cursor..end].trim() == "---" {
                break (cursor, self.after_newline(end));
            }
            cursor = self.after_newline(end);
        };

        let body = &self.src[body_start..body_end];
        self.pos = after_close;

        match serde_yaml::from_str::<serde_yaml::Value>(body) {
            Ok(value) => {
                debug!("front matter decoded ({} bytes)", body.len());
                Some(value)
            }
            Err(err) => {
                let offset = body_start + err.location().map(|l| l.index()).unwrap_or(0);
                self.errors.push(ParseError::new(
                    offset,
                    ErrorKind::YamlParse(err.to_string()),
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::ast::Block;
    use crate::error::ErrorKind;

    #[test]
    fn front_matter_decodes_mapping() {
        let out = parse("---\nkey: 1\n---\n\n# h\n");
        assert!(out.errors.is_empty());
        let yaml = out.yaml.unwrap();
        assert_eq!(yaml["key"], serde_yaml::Value::from(1));
        assert_eq!(out.blocks.len(), 1);
    }

    #[test]
    fn content_may_follow_the_closing_fence_directly() {
        let out = parse("---\nkey: 1\n---\n# h\n");
        assert_eq!(out.yaml.unwrap()["key"], serde_yaml::Value::from(1));
        assert_eq!(out.blocks.len(), 1);
        assert!(matches!(out.blocks[0], Block::Heading(_, _)));
    }

    #[test]
    fn unclosed_fence_is_a_thematic_break() {
        let out = parse("---\njust text\n");
        assert!(out.yaml.is_none());
        assert!(matches!(out.blocks[0], Block::ThematicBreak));
        assert!(matches!(out.blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn decoder_failure_is_reported_and_skipped() {
        let out = parse("---\nkey: [unclosed\n---\n\ntext\n");
        assert!(out.yaml.is_none());
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(out.errors[0].kind, ErrorKind::YamlParse(_)));
        assert!(matches!(out.blocks[0], Block::Paragraph(_)));
    }

    #[test]
    fn front_matter_at_eof() {
        let out = parse("---\nkey: v\n---\n");
        let yaml = out.yaml.unwrap();
        assert_eq!(yaml["key"], serde_yaml::Value::from("v"));
        assert!(out.blocks.is_empty());
    }
}
