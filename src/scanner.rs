//! Folding over the block tree.
//!
//! A scanner is a plain left fold with user state, visiting blocks in
//! document order and recursing into container children. Scanners
//! compose as products of folds, done by the caller.

use crate::ast::{Block, Inlines};
use crate::document::Document;

/// Left-fold `f` over every block of the document, containers before
/// their children, in document order.
pub fn run_scanner<A>(
    doc: &Document,
    init: A,
    mut f: impl FnMut(A, &Block<Inlines>) -> A,
) -> A {
    let mut state = init;
    for block in doc.blocks() {
        state = scan_block(state, block, &mut f);
    }
    state
}

fn scan_block<A>(
    state: A,
    block: &Block<Inlines>,
    f: &mut impl FnMut(A, &Block<Inlines>) -> A,
) -> A {
    let mut state = f(state, block);
    match block {
        Block::Blockquote(children) => {
            for child in children {
                state = scan_block(state, child, f);
            }
        }
        Block::OrderedList { items, .. } => {
            for item in items {
                for child in item {
                    state = scan_block(state, child, f);
                }
            }
        }
        Block::UnorderedList(items) => {
            for item in items {
                for child in item {
                    state = scan_block(state, child, f);
                }
            }
        }
        _ => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;

    #[test]
    fn counts_every_block_in_document_order() {
        let doc = parse("t.md", "# h\n\n> quoted\n\n- a\n- b\n").unwrap();
        let count = run_scanner(&doc, 0usize, |n, _| n + 1);
        // heading, blockquote, its paragraph, list, two naked items.
        assert_eq!(count, 6);
    }

    #[test]
    fn fold_sees_containers_before_children() {
        let doc = parse("t.md", "> inner\n").unwrap();
        let kinds = run_scanner(&doc, Vec::new(), |mut acc, block| {
            acc.push(match block {
                Block::Blockquote(_) => "blockquote",
                Block::Paragraph(_) => "paragraph",
                _ => "other",
            });
            acc
        });
        assert_eq!(kinds, vec!["blockquote", "paragraph"]);
    }
}
