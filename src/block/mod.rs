//! Phase one: block structure.
//!
//! The block parser walks the source with a single cursor and produces
//! blocks whose inline content is left unresolved as [`Isp`] spans. It also
//! extracts the optional YAML front matter and collects reference-link
//! definitions for the inline phase.
//!
//! Indentation drives container structure: `ref_level` is the minimum
//! column inherited from enclosing blockquotes and list items, and a line
//! indented four or more columns past it is code. Tabs count as four
//! columns.

mod frontmatter;
mod list;
mod table;

use log::debug;

use crate::ast::{Block, HeadingLevel};
use crate::error::{ErrorKind, ParseError};
use crate::location::TAB_WIDTH;
use crate::reference::ReferenceTable;
use crate::uri::Uri;

/// An unresolved inline span, or the marker of a block-level recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum Isp {
    /// Raw inline text together with its byte offset in the source.
    Span { offset: usize, text: String },
    /// A recovered block-level error; the error itself is also recorded in
    /// the parser's error list.
    Error(ParseError),
}

impl Isp {
    pub fn span(offset: usize, text: impl Into<String>) -> Self {
        Isp::Span {
            offset,
            text: text.into(),
        }
    }
}

/// Everything the block phase hands to the inline phase.
#[derive(Debug)]
pub struct BlockOutput {
    pub yaml: Option<serde_yaml::Value>,
    pub blocks: Vec<Block<Isp>>,
    pub refs: ReferenceTable,
    pub errors: Vec<ParseError>,
}

/// Parse the block structure of a whole document.
pub fn parse(input: &str) -> BlockOutput {
    BlockParser::new(input).run()
}

/// Extra indentation that turns content into an indented code block.
const CODE_INDENT: usize = 4;

pub(crate) struct BlockParser<'a> {
    src: &'a str,
    pos: usize,
    pub(crate) refs: ReferenceTable,
    pub(crate) errors: Vec<ParseError>,
}

impl<'a> BlockParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            refs: ReferenceTable::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> BlockOutput {
        let yaml = self.parse_front_matter();
        let blocks = self.parse_block_sequence(0, false);
        debug!(
            "block phase: {} top-level blocks, {} references, {} errors",
            blocks.len(),
            self.refs.len(),
            self.errors.len()
        );
        BlockOutput {
            yaml,
            blocks,
            refs: self.refs,
            errors: self.errors,
        }
    }

    /// Record an error and return the recovery payload carrying it.
    fn recover(&mut self, offset: usize, kind: ErrorKind) -> Isp {
        let error = ParseError::new(offset, kind);
        self.errors.push(error.clone());
        Isp::Error(error)
    }

    // ------------------------------------------------------------------
    // Cursor helpers

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Offset of the newline (or EOF) ending the line containing `pos`.
    fn line_end(&self, pos: usize) -> usize {
        self.src[pos..]
            .find(['\n', '\r'])
            .map(|i| pos + i)
            .unwrap_or(self.src.len())
    }

    /// Offset just past the newline sequence starting at `end`.
    fn after_newline(&self, end: usize) -> usize {
        let bytes = self.src.as_bytes();
        match bytes.get(end) {
            Some(b'\r') if bytes.get(end + 1) == Some(&b'\n') => end + 2,
            Some(b'\r') | Some(b'\n') => end + 1,
            _ => end,
        }
    }

    /// Start offset of the line containing `pos`.
    fn line_start(&self, pos: usize) -> usize {
        self.src[..pos]
            .rfind(['\n', '\r'])
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Tab-aware column (0-based) of `pos` within its line.
    fn column_at(&self, pos: usize) -> usize {
        let start = self.line_start(pos);
        self.src[start..pos]
            .chars()
            .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
            .sum()
    }

    /// The current line from `pos` up to (not including) its newline.
    fn current_line(&self) -> &'a str {
        &self.src[self.pos..self.line_end(self.pos)]
    }

    /// Whether only spaces and tabs remain between `pos` and the newline.
    fn blank_from(&self, pos: usize) -> bool {
        self.src[pos..self.line_end(pos)]
            .chars()
            .all(|c| c == ' ' || c == '\t')
    }

    /// Advance over spaces, tabs, and newlines up to the next content
    /// character.
    fn skip_blank(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' {
                self.pos += 1;
            } else if ch == '\n' || ch == '\r' {
                self.pos = self.after_newline(self.pos);
            } else {
                break;
            }
        }
    }

    /// Advance past the current line, including its newline.
    fn skip_line(&mut self) {
        self.pos = self.after_newline(self.line_end(self.pos));
    }

    /// Indentation in columns and content offset of the line at
    /// `line_start`.
    fn indent_of(&self, line_start: usize) -> (usize, usize) {
        let mut cols = 0;
        let mut offset = line_start;
        for ch in self.src[line_start..].chars() {
            match ch {
                ' ' => cols += 1,
                '\t' => cols += TAB_WIDTH,
                _ => break,
            }
            offset += ch.len_utf8();
        }
        (cols, offset)
    }

    // ------------------------------------------------------------------
    // Block sequence

    /// Parse blocks until EOF or a dedent below `ref_level`.
    ///
    /// The cursor may start mid-line (just past a blockquote marker or a
    /// list bullet); already-consumed characters count toward the
    /// indentation of that first line.
    pub(crate) fn parse_block_sequence(
        &mut self,
        ref_level: usize,
        naked_allowed: bool,
    ) -> Vec<Block<Isp>> {
        let mut blocks = Vec::new();
        loop {
            let checkpoint = self.pos;
            self.skip_blank();
            if self.eof() {
                break;
            }
            let alevel = self.column_at(self.pos);
            if alevel < ref_level {
                // The enclosing context ends; hand the line back.
                self.pos = checkpoint;
                break;
            }
            if alevel >= ref_level + CODE_INDENT {
                blocks.push(self.indented_code_block(ref_level));
                continue;
            }
            if let Some(block) = self.parse_one_block(alevel, ref_level, naked_allowed) {
                blocks.push(block);
            }
        }
        blocks
    }

    /// Dispatch on the first content character of a line.
    ///
    /// Returns `None` when input was consumed without producing a block
    /// (a well-formed reference definition).
    fn parse_one_block(
        &mut self,
        alevel: usize,
        ref_level: usize,
        naked_allowed: bool,
    ) -> Option<Block<Isp>> {
        let line = self.current_line();
        if is_thematic_break_line(line) {
            self.skip_line();
            return Some(Block::ThematicBreak);
        }
        if let Some(block) = self.try_atx_heading() {
            return Some(block);
        }
        if let Some(block) = self.try_fenced_code_block(ref_level) {
            return Some(block);
        }
        if let Some(block) = self.try_table(ref_level) {
            return Some(block);
        }
        if let Some(block) = self.try_unordered_list(alevel) {
            return Some(block);
        }
        if let Some(block) = self.try_ordered_list(alevel) {
            return Some(block);
        }
        if self.peek() == Some('>') {
            return Some(self.blockquote(alevel));
        }
        if let Some(emitted) = self.try_reference_definition() {
            return emitted;
        }
        Some(self.paragraph(ref_level, naked_allowed))
    }

    // ------------------------------------------------------------------
    // Leaf blocks

    /// ATX heading: 1..6 hashes, a space, content, optional closing run.
    fn try_atx_heading(&mut self) -> Option<Block<Isp>> {
        let line = self.current_line();
        let hashes = line.chars().take_while(|&c| c == '#').count();
        if hashes == 0 {
            return None;
        }
        let after = line[hashes..].chars().next();
        if !matches!(after, None | Some(' ') | Some('\t')) {
            // `#fragment`-style text, not a heading.
            return None;
        }
        let Some(level) = HeadingLevel::from_depth(hashes) else {
            // Clearly meant as a heading, but too deep; recover in place.
            let isp = self.recover(
                self.pos,
                ErrorKind::Unexpected {
                    found: format!("{hashes} '#' characters"),
                    expected: "a heading level between 1 and 6".to_string(),
                },
            );
            self.skip_line();
            return Some(Block::Heading(HeadingLevel::H1, isp));
        };

        let mut content_off = self.pos + hashes;
        for ch in self.src[content_off..self.line_end(self.pos)].chars() {
            if ch == ' ' || ch == '\t' {
                content_off += ch.len_utf8();
            } else {
                break;
            }
        }
        let raw = &self.src[content_off..self.line_end(self.pos)];
        let text = strip_closing_hashes(raw.trim_end());
        let isp = Isp::span(content_off, text);
        self.skip_line();
        Some(Block::Heading(level, isp))
    }

    /// Fenced code block with backticks or tildes.
    fn try_fenced_code_block(&mut self, ref_level: usize) -> Option<Block<Isp>> {
        let line = self.current_line();
        let fence_char = match line.chars().next() {
            Some(c @ ('`' | '~')) => c,
            _ => return None,
        };
        let fence_len = line.chars().take_while(|&c| c == fence_char).count();
        if fence_len < 3 {
            return None;
        }
        let info_raw = line[fence_len..].trim();
        if fence_char == '`' && info_raw.contains('`') {
            return None;
        }
        let info = if info_raw.is_empty() {
            None
        } else {
            Some(info_raw.to_string())
        };

        self.skip_line();
        let mut content = String::new();
        while !self.eof() {
            let line_start = self.pos;
            let (indent, content_off) = self.indent_of(line_start);
            let end = self.line_end(line_start);
            if indent < ref_level + CODE_INDENT {
                let candidate = &self.src[content_off..end];
                let run = candidate.chars().take_while(|&c| c == fence_char).count();
                if run >= fence_len && candidate[run..].chars().all(|c| c == ' ' || c == '\t') {
                    self.skip_line();
                    break;
                }
            }
            content.push_str(&strip_columns(&self.src[line_start..end], ref_level));
            content.push('\n');
            self.skip_line();
        }
        Some(Block::CodeBlock { info, content })
    }

    /// Indented code block: lines four or more columns past the reference
    /// level. Blank lines survive only between content lines.
    fn indented_code_block(&mut self, ref_level: usize) -> Block<Isp> {
        let mut content = String::new();
        let mut pending_blanks = 0usize;

        // The cursor sits at the first content character and may be
        // mid-line, just past a container marker, so the first line's
        // surplus indentation is rebuilt from its column.
        let first_indent = self.column_at(self.pos);
        for _ in 0..first_indent.saturating_sub(ref_level + CODE_INDENT) {
            content.push(' ');
        }
        let first_end = self.line_end(self.pos);
        content.push_str(&self.src[self.pos..first_end]);
        content.push('\n');
        self.skip_line();

        while !self.eof() {
            let line_start = self.pos;
            if self.blank_from(line_start) {
                pending_blanks += 1;
                self.skip_line();
                continue;
            }
            let (indent, _) = self.indent_of(line_start);
            if indent < ref_level + CODE_INDENT {
                self.pos = line_start;
                break;
            }
            for _ in 0..pending_blanks {
                content.push('\n');
            }
            pending_blanks = 0;
            let end = self.line_end(line_start);
            content.push_str(&strip_columns(
                &self.src[line_start..end],
                ref_level + CODE_INDENT,
            ));
            content.push('\n');
            self.skip_line();
        }
        Block::CodeBlock {
            info: None,
            content,
        }
    }

    // ------------------------------------------------------------------
    // Container blocks

    /// Blockquote: a `>` marker, then an indentation-scoped body.
    fn blockquote(&mut self, alevel: usize) -> Block<Isp> {
        debug_assert_eq!(self.peek(), Some('>'));
        self.pos += 1;
        let mut body_level = alevel + 1;
        if self.peek() == Some(' ') {
            self.pos += 1;
            body_level += 1;
        }
        let children = self.parse_block_sequence(body_level, false);
        Block::Blockquote(children)
    }

    // ------------------------------------------------------------------
    // Reference definitions

    /// `[label]: dest "title"`, registered into the table; no block is
    /// emitted for a well-formed definition.
    ///
    /// The outer `Option` is the recognizer result; the inner one is the
    /// emitted block (`None` for a well-formed definition, a recovery
    /// `Naked` for a malformed one).
    fn try_reference_definition(&mut self) -> Option<Option<Block<Isp>>> {
        if self.peek() != Some('[') {
            return None;
        }
        let line = self.current_line();
        let close = find_unescaped(line, ']')?;
        if line[close + 1..].chars().next() != Some(':') {
            return None;
        }
        let label = &line[1..close];
        if label.trim().is_empty() {
            return None;
        }
        let label = label.to_string();

        // Committed from here on: a malformed body is an error, not a
        // paragraph.
        let def_offset = self.pos;
        self.pos += close + 2;
        self.skip_spaces_and_one_newline();

        let dest_offset = self.pos;
        let dest_text = match self.scan_link_destination() {
            Some(text) => text,
            None => return Some(Some(self.recover_definition(dest_offset))),
        };
        let dest = match Uri::parse(&dest_text) {
            Ok(dest) => dest,
            Err(_) => return Some(Some(self.recover_definition(dest_offset))),
        };

        let title = self.scan_optional_title();
        if !self.blank_from(self.pos) {
            let trailing = self.pos;
            return Some(Some(self.recover_definition(trailing)));
        }
        self.skip_line();

        if !self.refs.insert(&label, dest, title) {
            let error = ParseError::new(
                def_offset,
                ErrorKind::DuplicateReferenceDefinition(crate::reference::normalize_label(&label)),
            );
            self.errors.push(error);
        }
        Some(None)
    }

    fn recover_definition(&mut self, error_offset: usize) -> Block<Isp> {
        let isp = self.recover(
            error_offset,
            ErrorKind::Unexpected {
                found: "malformed reference definition".to_string(),
                expected: "a URI and optional title".to_string(),
            },
        );
        self.skip_to_blank_line();
        Block::Naked(isp)
    }

    /// Skip spaces and tabs, and at most one newline (definitions may wrap
    /// once between the colon and the destination, or before the title).
    fn skip_spaces_and_one_newline(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
        if matches!(self.peek(), Some('\n') | Some('\r')) {
            self.pos = self.after_newline(self.pos);
            while matches!(self.peek(), Some(' ') | Some('\t')) {
                self.pos += 1;
            }
        }
    }

    /// Angle-bracketed or naked destination at the cursor.
    fn scan_link_destination(&mut self) -> Option<String> {
        match self.peek() {
            Some('<') => {
                let rest = self.rest();
                let close = rest.find('>')?;
                let inner = &rest[1..close];
                if inner.contains(['\n', '\r']) {
                    return None;
                }
                self.pos += close + 1;
                Some(inner.to_string())
            }
            Some(_) => {
                let rest = self.rest();
                let len = rest
                    .find(|c: char| c.is_whitespace())
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

    /// Optional `"…"`, `'…'`, or `(…)` title, possibly on the next line.
    fn scan_optional_title(&mut self) -> Option<String> {
        let checkpoint = self.pos;
        self.skip_spaces_and_one_newline();
        let (open, close) = match self.peek() {
            Some('"') => ('"', '"'),
            Some('\'') => ('\'', '\''),
            Some('(') => ('(', ')'),
            _ => {
                self.pos = checkpoint;
                return None;
            }
        };
        let rest = self.rest();
        let end = match find_unescaped(&rest[open.len_utf8()..], close) {
            Some(i) => i + open.len_utf8(),
            None => {
                self.pos = checkpoint;
                return None;
            }
        };
        let title = rest[open.len_utf8()..end].to_string();
        self.pos += end + close.len_utf8();
        Some(title)
    }

    /// Consume up to (not including) the next blank line; block-level
    /// recovery resynchronizes here.
    fn skip_to_blank_line(&mut self) {
        while !self.eof() {
            if self.blank_from(self.pos) {
                break;
            }
            self.skip_line();
        }
    }

    // ------------------------------------------------------------------
    // Paragraphs

    /// Paragraph or naked inline run, depending on context and terminator.
    fn paragraph(&mut self, ref_level: usize, naked_allowed: bool) -> Block<Isp> {
        let offset = self.pos;
        let mut lines: Vec<String> = vec![self.current_line().to_string()];
        self.skip_line();

        let mut blank_terminated = false;
        while !self.eof() {
            let line_start = self.pos;
            if self.blank_from(line_start) {
                blank_terminated = true;
                break;
            }
            let (indent, content_off) = self.indent_of(line_start);
            if indent < ref_level {
                break;
            }
            if indent < ref_level + CODE_INDENT {
                let content = &self.src[content_off..self.line_end(line_start)];
                if starts_block(content) {
                    break;
                }
            }
            let end = self.line_end(line_start);
            lines.push(strip_columns(&self.src[line_start..end], ref_level));
            self.skip_line();
        }

        let mut text = lines.join("\n");
        text.truncate(text.trim_end().len());
        let isp = Isp::span(offset, text);
        if naked_allowed && !blank_terminated {
            Block::Naked(isp)
        } else {
            Block::Paragraph(isp)
        }
    }
}

// ----------------------------------------------------------------------
// Line predicates and helpers shared by recognizers and the paragraph
// terminator.

/// Would this line content begin a new block at its indentation?
fn starts_block(content: &str) -> bool {
    is_thematic_break_line(content)
        || starts_atx_heading(content)
        || starts_fence(content)
        || starts_bullet(content)
        || starts_ordered_index(content)
        || content.starts_with('>')
}

/// A line of three or more of the same `*`, `-`, or `_` and nothing else.
fn is_thematic_break_line(line: &str) -> bool {
    let mut marker = None;
    let mut count = 0;
    for ch in line.chars() {
        if ch == ' ' || ch == '\t' {
            continue;
        }
        match marker {
            None if matches!(ch, '*' | '-' | '_') => {
                marker = Some(ch);
                count = 1;
            }
            Some(m) if ch == m => count += 1,
            _ => return false,
        }
    }
    count >= 3
}

fn starts_atx_heading(content: &str) -> bool {
    let hashes = content.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes)
        && matches!(content[hashes..].chars().next(), None | Some(' ') | Some('\t'))
}

fn starts_fence(content: &str) -> bool {
    let first = match content.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return false,
    };
    content.chars().take_while(|&c| c == first).count() >= 3
}

pub(crate) fn starts_bullet(content: &str) -> bool {
    let mut chars = content.chars();
    matches!(chars.next(), Some('-' | '+' | '*'))
        && matches!(chars.next(), None | Some(' ') | Some('\t'))
}

pub(crate) fn starts_ordered_index(content: &str) -> bool {
    let digits = content.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return false;
    }
    let mut rest = content[digits..].chars();
    matches!(rest.next(), Some('.' | ')')) && matches!(rest.next(), None | Some(' ') | Some('\t'))
}

/// Remove a trailing run of hashes preceded by whitespace: `## x ##` → `x`.
fn strip_closing_hashes(text: &str) -> String {
    let trimmed = text.trim_end_matches('#');
    if trimmed.len() == text.len() {
        return text.to_string();
    }
    if trimmed.is_empty() {
        // The content was nothing but hashes.
        return String::new();
    }
    if trimmed.ends_with([' ', '\t']) {
        trimmed.trim_end().to_string()
    } else {
        text.to_string()
    }
}

/// Strip up to `columns` columns of leading whitespace, expanding a
/// straddling tab into spaces.
pub(crate) fn strip_columns(line: &str, columns: usize) -> String {
    let mut cols = 0;
    let mut offset = 0;
    for ch in line.chars() {
        if cols >= columns {
            break;
        }
        match ch {
            ' ' => cols += 1,
            '\t' => cols += TAB_WIDTH,
            _ => break,
        }
        offset += ch.len_utf8();
    }
    if cols > columns {
        // A tab carried past the boundary; keep the overshoot as spaces.
        let mut out = " ".repeat(cols - columns);
        out.push_str(&line[offset..]);
        out
    } else {
        line[offset..].to_string()
    }
}

/// Find the first occurrence of `wanted` not preceded by an odd number of
/// backslashes.
pub(crate) fn find_unescaped(text: &str, wanted: char) -> Option<usize> {
    let mut backslashes = 0;
    for (i, ch) in text.char_indices() {
        if ch == wanted && backslashes % 2 == 0 {
            return Some(i);
        }
        if ch == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
    }
    None
}
