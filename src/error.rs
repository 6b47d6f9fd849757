//! Error taxonomy and the post-parse error bundle.
//!
//! Recoverable errors accumulate while both parser phases keep going; once
//! everything has been processed the collected errors are bundled and the
//! parse as a whole fails. Offsets are byte offsets into the original
//! input; the bundle renders them 1-indexed and tab-aware.

use thiserror::Error;

use crate::ast::NonEmpty;
use crate::location::SourceIndex;

/// Everything that can go wrong in a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("YAML parse error: {0}")]
    YamlParse(String),
    #[error("ordered list start index {0} is too big")]
    ListStartIndexTooBig(u64),
    #[error("ordered list index {actual} is out of order, expected {expected}")]
    ListIndexOutOfOrder { actual: u64, expected: u64 },
    #[error("duplicate reference definition: [{0}]")]
    DuplicateReferenceDefinition(String),
    #[error("could not find reference definition [{label}]{}", format_nearest(.nearest))]
    CouldNotFindReferenceDefinition {
        label: String,
        nearest: Vec<String>,
    },
    #[error("non-flanking delimiter run: {0}")]
    NonFlankingDelimiterRun(String),
    #[error("invalid numeric character reference: {0}")]
    InvalidNumericCharacter(u32),
    #[error("unknown HTML entity name: {0}")]
    UnknownHtmlEntityName(String),
    #[error("unexpected {found}, expected {expected}")]
    Unexpected { found: String, expected: String },
}

fn format_nearest(nearest: &[String]) -> String {
    if nearest.is_empty() {
        String::new()
    } else {
        let names = nearest
            .iter()
            .map(|n| format!("[{n}]"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(", perhaps you meant {names}?")
    }
}

/// A single error at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(offset: usize, kind: ErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// All errors found in one document, with enough context to render
/// diagnostics.
#[derive(Debug, Clone)]
pub struct ParseBundle {
    file_name: String,
    errors: NonEmpty<ParseError>,
    index: SourceIndex,
}

impl ParseBundle {
    /// Bundle the collected errors. Returns `None` when there are none
    /// (the parse succeeded).
    pub fn from_errors(file_name: &str, input: &str, mut errors: Vec<ParseError>) -> Option<Self> {
        errors.sort_by_key(|e| e.offset);
        errors.dedup();
        NonEmpty::from_vec(errors).map(|errors| Self {
            file_name: file_name.to_string(),
            errors,
            index: SourceIndex::new(input),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The collected errors, sorted by offset.
    pub fn errors(&self) -> &NonEmpty<ParseError> {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// True when any error matches the predicate.
    pub fn any(&self, pred: impl Fn(&ErrorKind) -> bool) -> bool {
        self.errors.iter().any(|e| pred(&e.kind))
    }
}

impl std::fmt::Display for ParseBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let pos = self.index.position(error.offset);
            write!(f, "{}:{}: {}", self.file_name, pos, error.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseBundle {}
