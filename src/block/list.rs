//! Ordered and unordered lists, including tight/loose normalization.
//!
//! The first item fixes the bullet character (or the index delimiter);
//! bodies are parsed one column past the marker with naked inline runs
//! allowed, and the collected items are normalized afterwards so tight
//! lists carry `Naked` payloads and loose lists carry `Paragraph`s.

use crate::ast::{Block, NonEmpty};
use crate::error::{ErrorKind, ParseError};

use super::{starts_bullet, starts_ordered_index, BlockParser, Isp};

/// Ordered-list start indices beyond this are reported.
const MAX_START_INDEX: u64 = 999_999_999;

impl BlockParser<'_> {
    /// Unordered list at bullet column `alevel`.
    pub(crate) fn try_unordered_list(&mut self, alevel: usize) -> Option<Block<Isp>> {
        if !starts_bullet(self.current_line()) {
            return None;
        }
        let bullet = self.peek().expect("bullet present");

        self.pos += 1;
        let mut items = NonEmpty::new(self.list_item_tail(alevel));

        loop {
            let checkpoint = self.pos;
            self.skip_blank();
            if self.eof() || self.column_at(self.pos) != alevel {
                self.pos = checkpoint;
                break;
            }
            let line = self.current_line();
            if !starts_bullet(line) || !line.starts_with(bullet) {
                self.pos = checkpoint;
                break;
            }
            self.pos += 1;
            items.push(self.list_item_tail(alevel));
        }

        Some(Block::UnorderedList(normalize_list_items(items)))
    }

    /// Ordered list at index column `alevel`.
    pub(crate) fn try_ordered_list(&mut self, alevel: usize) -> Option<Block<Isp>> {
        if !starts_ordered_index(self.current_line()) {
            return None;
        }
        let index_offset = self.pos;
        let (start, delimiter) = self.consume_ordered_marker();
        if start > MAX_START_INDEX {
            self.errors
                .push(ParseError::new(index_offset, ErrorKind::ListStartIndexTooBig(start)));
        }
        let mut items = NonEmpty::new(self.list_item_tail(alevel));
        let mut expected = start.saturating_add(1);

        loop {
            let checkpoint = self.pos;
            self.skip_blank();
            if self.eof() || self.column_at(self.pos) != alevel {
                self.pos = checkpoint;
                break;
            }
            let line = self.current_line();
            if !starts_ordered_index(line) {
                self.pos = checkpoint;
                break;
            }
            let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
            if line[digits..].chars().next() != Some(delimiter) {
                // A different delimiter starts a different list.
                self.pos = checkpoint;
                break;
            }
            let item_offset = self.pos;
            let (actual, _) = self.consume_ordered_marker();
            if actual != expected {
                self.errors.push(ParseError::new(
                    item_offset,
                    ErrorKind::ListIndexOutOfOrder { actual, expected },
                ));
            }
            expected = actual.saturating_add(1);
            items.push(self.list_item_tail(alevel));
        }

        Some(Block::OrderedList {
            start: start.min(u64::from(u32::MAX)) as u32,
            items: normalize_list_items(items),
        })
    }

    /// Consume `digits` + delimiter at the cursor; the value saturates so
    /// absurdly long indices still report their magnitude class.
    fn consume_ordered_marker(&mut self) -> (u64, char) {
        let mut value: u64 = 0;
        while let Some(ch) = self.peek() {
            let Some(digit) = ch.to_digit(10) else { break };
            value = value.saturating_mul(10).saturating_add(u64::from(digit));
            self.pos += 1;
        }
        let delimiter = self.peek().expect("delimiter present");
        self.pos += 1;
        (value, delimiter)
    }

    /// Body of one list item; the cursor sits just past the marker.
    fn list_item_tail(&mut self, marker_level: usize) -> Vec<Block<Isp>> {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
        self.parse_block_sequence(marker_level + 1, true)
    }
}

/// Decide tight versus loose and rewrite payload wrappers accordingly.
///
/// Loose when a `Paragraph` appears anywhere but as the very last block of
/// the last item (that one only means a blank line followed the list), or
/// when any item after the first carries a nested list. Loose lists get
/// `Paragraph` wrappers everywhere; tight lists get none.
pub(crate) fn normalize_list_items(
    items: NonEmpty<Vec<Block<Isp>>>,
) -> NonEmpty<Vec<Block<Isp>>> {
    let item_count = items.len();
    let mut loose = false;
    for (i, item) in items.iter().enumerate() {
        for (j, block) in item.iter().enumerate() {
            let final_block = i + 1 == item_count && j + 1 == item.len();
            match block {
                Block::Paragraph(_) if !final_block => loose = true,
                Block::OrderedList { .. } | Block::UnorderedList(_) if i > 0 => loose = true,
                _ => {}
            }
        }
    }

    items.map(|item| {
        item.into_iter()
            .map(|block| match block {
                Block::Naked(payload) if loose => Block::Paragraph(payload),
                Block::Paragraph(payload) if !loose => Block::Naked(payload),
                other => other,
            })
            .collect()
    })
}
