//! The parse pipeline and the parsed document.
//!
//! `parse` runs the block phase, resolves every inline span against the
//! collected reference table, and either returns a [`Document`] or the
//! bundle of everything that went wrong.

use log::debug;

use crate::ast::{Block, Inlines};
use crate::block::{self, Isp};
use crate::error::ParseBundle;
use crate::extension::Extension;
use crate::inline;
use crate::render::Html;

/// A fully parsed document plus the extension applied at render time.
#[derive(Clone, Default)]
pub struct Document {
    yaml: Option<serde_yaml::Value>,
    blocks: Vec<Block<Inlines>>,
    extension: Extension,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("yaml", &self.yaml)
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// The decoded YAML front matter, when the document had one.
    pub fn yaml(&self) -> Option<&serde_yaml::Value> {
        self.yaml.as_ref()
    }

    pub fn blocks(&self) -> &[Block<Inlines>] {
        &self.blocks
    }

    pub(crate) fn extension(&self) -> &Extension {
        &self.extension
    }

    /// Attach an extension; the document's existing extension applies
    /// first, then `ext`.
    pub fn with_extension(mut self, ext: Extension) -> Self {
        self.extension = std::mem::take(&mut self.extension).compose(ext);
        self
    }

    /// Attach several extensions at once, composed left to right.
    pub fn with_extensions(self, exts: impl IntoIterator<Item = Extension>) -> Self {
        let combined = exts
            .into_iter()
            .fold(Extension::new(), Extension::compose);
        self.with_extension(combined)
    }

    /// Render to an HTML fragment.
    pub fn render(&self) -> Html {
        crate::render::render(self)
    }
}

/// Parse a document.
///
/// `file_name` is used only in diagnostics. All errors from both phases
/// are collected; the result is `Err` exactly when at least one was
/// recorded.
pub fn parse(file_name: &str, input: &str) -> Result<Document, ParseBundle> {
    let block::BlockOutput {
        yaml,
        blocks,
        refs,
        mut errors,
    } = block::parse(input);

    let resolved: Vec<Block<Option<Inlines>>> = blocks
        .into_iter()
        .map(|block| {
            block.map(&mut |isp| match isp {
                Isp::Span { offset, text } => match inline::parse_inlines(offset, &text, &refs) {
                    Ok(inlines) => Some(inlines),
                    Err(inline_errors) => {
                        errors.extend(inline_errors);
                        None
                    }
                },
                // The recovery already recorded its error.
                Isp::Error(_) => None,
            })
        })
        .collect();

    if let Some(bundle) = ParseBundle::from_errors(file_name, input, errors) {
        debug!("{file_name}: {} parse errors", bundle.len());
        return Err(bundle);
    }

    let blocks = resolved
        .into_iter()
        .map(|block| block.map(&mut |payload: Option<Inlines>| payload.expect("no errors recorded")))
        .collect();
    Ok(Document {
        yaml,
        blocks,
        extension: Extension::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{plain_text, Inline};

    #[test]
    fn parse_resolves_inlines() {
        let doc = parse("test.md", "a *b* c\n").unwrap();
        match &doc.blocks()[0] {
            Block::Paragraph(inlines) => {
                assert_eq!(plain_text(inlines.as_slice()), "a b c");
                assert!(matches!(inlines[1], Inline::Emphasis(_)));
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn forward_references_resolve() {
        let doc = parse("test.md", "[x][y]\n\n[y]: /u \"t\"\n").unwrap();
        match &doc.blocks()[0] {
            Block::Paragraph(inlines) => match &inlines[0] {
                Inline::Link { dest, title, .. } => {
                    assert_eq!(dest.as_str(), "/u");
                    assert_eq!(title.as_deref(), Some("t"));
                }
                other => panic!("expected link, got {other:?}"),
            },
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn errors_from_both_phases_bundle_together() {
        let err = parse("test.md", "####### deep\n\nfoo* bar\n").unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.file_name(), "test.md");
    }

    #[test]
    fn bundle_display_is_line_oriented() {
        let err = parse("in.md", "x &nope; y\n").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.starts_with("in.md:1:3:"), "got: {rendered}");
        assert!(rendered.contains("nope"));
    }
}
