//! Pipe tables.
//!
//! A table is a header row followed by a divider row of `:?-{3,}:?` cells.
//! Detection is deliberately conservative: the header needs a structural
//! pipe and the divider must consist almost entirely of divider characters
//! before the parser commits; once committed, a malformed divider is an
//! error, not a paragraph.

use crate::ast::{Block, CellAlign, NonEmpty};
use crate::error::ErrorKind;

use super::{BlockParser, Isp, CODE_INDENT};

/// Share of divider-row characters that must come from `space | - :`.
const DIVIDER_THRESHOLD: f64 = 0.8;

impl BlockParser<'_> {
    /// Table at the cursor; `ref_level` bounds how far rows may dedent.
    pub(crate) fn try_table(&mut self, ref_level: usize) -> Option<Block<Isp>> {
        let header_offset = self.pos;
        let header_line = self.current_line();
        let header_cells = split_cells(header_line, header_offset)?;

        let header_end = self.line_end(self.pos);
        let divider_start = self.after_newline(header_end);
        if divider_start >= self.src.len() {
            return None;
        }
        let divider_line = &self.src[divider_start..self.line_end(divider_start)];
        if !divider_looks_structural(divider_line) {
            return None;
        }

        // Committed: this was meant to be a table.
        self.skip_line();
        let divider_offset = self.pos;
        self.skip_line();

        let aligns = match parse_divider(divider_line) {
            Some(aligns) if aligns.len() == header_cells.len() => aligns,
            Some(aligns) => {
                let isp = self.recover(
                    divider_offset,
                    ErrorKind::Unexpected {
                        found: format!("a divider with {} columns", aligns.len()),
                        expected: format!("{} columns as in the header", header_cells.len()),
                    },
                );
                self.skip_to_blank_line();
                return Some(Block::Naked(isp));
            }
            None => {
                let isp = self.recover(
                    divider_offset,
                    ErrorKind::Unexpected {
                        found: "a malformed table divider".to_string(),
                        expected: "cells of dashes with optional colons".to_string(),
                    },
                );
                self.skip_to_blank_line();
                return Some(Block::Naked(isp));
            }
        };

        let columns = header_cells.len();
        let mut rows = NonEmpty::new(pad_row(header_cells, columns, header_end));

        while !self.eof() && !self.blank_from(self.pos) {
            let line_start = self.pos;
            let (indent, _) = self.indent_of(line_start);
            if indent < ref_level || indent >= ref_level + CODE_INDENT {
                break;
            }
            let line = &self.src[line_start..self.line_end(line_start)];
            let line_end = self.line_end(line_start);
            let cells = split_cells(line, line_start)
                .unwrap_or_else(|| vec![Isp::span(line_start, line.trim().to_string())]);
            rows.push(pad_row(cells, columns, line_end));
            self.skip_line();
        }

        let aligns = NonEmpty::from_vec(aligns).expect("divider has at least one column");
        Some(Block::Table { aligns, rows })
    }
}

/// Pad short rows with empty cells and drop extras beyond the header.
fn pad_row(mut cells: Vec<Isp>, columns: usize, end_offset: usize) -> NonEmpty<Isp> {
    cells.truncate(columns);
    while cells.len() < columns {
        cells.push(Isp::span(end_offset, String::new()));
    }
    NonEmpty::from_vec(cells).expect("columns >= 1")
}

/// Quick shape check before committing: mostly `space | - :`, at least one
/// dash and one pipe-or-structural hint.
fn divider_looks_structural(line: &str) -> bool {
    if line.trim().is_empty() || !line.contains('-') {
        return false;
    }
    let total = line.chars().count();
    let structural = line
        .chars()
        .filter(|c| matches!(c, ' ' | '\t' | '|' | '-' | ':'))
        .count();
    structural as f64 / total as f64 > DIVIDER_THRESHOLD
}

/// Parse the divider row into per-column alignments.
fn parse_divider(line: &str) -> Option<Vec<CellAlign>> {
    let segments = split_on_pipes(line)?;
    let mut aligns = Vec::with_capacity(segments.len());
    for segment in segments {
        let cell = segment.trim();
        let left = cell.starts_with(':');
        let right = cell.ends_with(':') && cell.len() > 1;
        let dashes = &cell[usize::from(left)..cell.len() - usize::from(right)];
        if dashes.len() < 3 || !dashes.chars().all(|c| c == '-') {
            return None;
        }
        aligns.push(match (left, right) {
            (true, true) => CellAlign::Center,
            (true, false) => CellAlign::Left,
            (false, true) => CellAlign::Right,
            (false, false) => CellAlign::Default,
        });
    }
    Some(aligns)
}

/// Split a row into cell ISPs at unescaped pipes outside backtick code
/// spans; returns `None` when the line holds no structural pipe.
fn split_cells(line: &str, base_offset: usize) -> Option<Vec<Isp>> {
    let boundaries = pipe_boundaries(line);
    if boundaries.is_empty() {
        return None;
    }

    let mut segments: Vec<(usize, &str)> = Vec::new();
    let mut start = 0;
    for &b in &boundaries {
        segments.push((start, &line[start..b]));
        start = b + 1;
    }
    segments.push((start, &line[start..]));

    // A leading or trailing pipe contributes an empty outer segment.
    if segments
        .first()
        .is_some_and(|(_, text)| text.trim().is_empty())
    {
        segments.remove(0);
    }
    if segments.len() > 1
        && segments
            .last()
            .is_some_and(|(_, text)| text.trim().is_empty())
    {
        segments.pop();
    }
    if segments.is_empty() {
        return None;
    }

    Some(
        segments
            .into_iter()
            .map(|(seg_start, text)| {
                let leading = text.len() - text.trim_start().len();
                Isp::span(base_offset + seg_start + leading, text.trim().to_string())
            })
            .collect(),
    )
}

/// Byte offsets of structural pipes: unescaped and outside code spans.
fn pipe_boundaries(line: &str) -> Vec<usize> {
    let bytes = line.as_bytes();
    let mut boundaries = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let run = count_run(bytes, i, b'`');
                match find_closing_run(bytes, i + run, run) {
                    Some(close) => i = close,
                    None => i += run,
                }
            }
            b'|' => {
                boundaries.push(i);
                i += 1;
            }
            _ => i += 1,
        }
    }
    boundaries
}

fn count_run(bytes: &[u8], at: usize, wanted: u8) -> usize {
    bytes[at..].iter().take_while(|&&b| b == wanted).count()
}

/// Offset just past a closing run of exactly `len` backticks.
fn find_closing_run(bytes: &[u8], mut from: usize, len: usize) -> Option<usize> {
    while from < bytes.len() {
        if bytes[from] == b'`' {
            let run = count_run(bytes, from, b'`');
            if run == len {
                return Some(from + run);
            }
            from += run;
        } else {
            from += 1;
        }
    }
    None
}

fn split_on_pipes(line: &str) -> Option<Vec<&str>> {
    let boundaries = pipe_boundaries(line);
    let mut segments = Vec::new();
    let mut start = 0;
    for &b in &boundaries {
        segments.push(&line[start..b]);
        start = b + 1;
    }
    segments.push(&line[start..]);
    if segments.first().is_some_and(|s| s.trim().is_empty()) {
        segments.remove(0);
    }
    if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    #[test]
    fn simple_table_parses() {
        let out = parse("a | b\n--- | ---\n1 | 2\n");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        match &out.blocks[0] {
            Block::Table { aligns, rows } => {
                assert_eq!(aligns.as_slice(), &[CellAlign::Default, CellAlign::Default]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].as_slice(), &[Isp::span(0, "a"), Isp::span(4, "b")]);
                assert_eq!(rows[1].as_slice(), &[Isp::span(16, "1"), Isp::span(20, "2")]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn alignment_markers() {
        let out = parse("| a | b | c | d |\n| :--- | ---: | :---: | --- |\n");
        match &out.blocks[0] {
            Block::Table { aligns, .. } => {
                assert_eq!(
                    aligns.as_slice(),
                    &[
                        CellAlign::Left,
                        CellAlign::Right,
                        CellAlign::Center,
                        CellAlign::Default
                    ]
                );
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn pipes_in_code_spans_do_not_split() {
        let cells = split_cells("`a|b` | c", 0).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], Isp::span(0, "`a|b`"));
        assert_eq!(cells[1], Isp::span(8, "c"));
    }

    #[test]
    fn escaped_pipes_do_not_split() {
        let cells = split_cells("a \\| b | c", 0).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], Isp::span(0, "a \\| b"));
    }

    #[test]
    fn divider_column_mismatch_recovers() {
        let out = parse("a | b\n--- | --- | ---\n");
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(out.blocks[0], Block::Naked(Isp::Error(_))));
    }

    #[test]
    fn short_dash_runs_fail_the_committed_divider() {
        // The shape says "table", so the parser commits and the bad
        // divider is a recovered error rather than a paragraph.
        let out = parse("a | b\n-- | --\n");
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(out.blocks[0], Block::Naked(Isp::Error(_))));
    }

    #[test]
    fn rows_pad_and_truncate_to_header_width() {
        let out = parse("a | b\n--- | ---\nonly\n1 | 2 | 3\n");
        match &out.blocks[0] {
            Block::Table { rows, .. } => {
                assert_eq!(rows.len(), 3);
                assert_eq!(rows[1].len(), 2);
                assert_eq!(rows[1][1], Isp::span(20, ""));
                assert_eq!(rows[2].len(), 2);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn table_ends_at_blank_line() {
        let out = parse("a | b\n--- | ---\n1 | 2\n\nafter\n");
        assert_eq!(out.blocks.len(), 2);
        assert!(matches!(out.blocks[1], Block::Paragraph(_)));
    }
}
