//! The extension algebra.
//!
//! An extension is four independent monoids: an AST transform and a
//! layered renderer for each of the block and inline levels. Composition
//! is associative with the empty extension as identity; in a composed
//! extension the first operand's functions run first.

use std::rc::Rc;

use crate::ast::{Block, Inline, Inlines};
use crate::render::Html;

type BlockPayload = (Inlines, Html);
type TransFn<T> = Rc<dyn Fn(T) -> T>;

/// A layered renderer over `T`.
///
/// Layers receive the node and what rendering has produced so far
/// (starting from the default render) and return the replacement HTML.
/// Layers apply in insertion order; the empty chain is the identity.
pub struct Render<T> {
    layers: Vec<Rc<dyn Fn(&T, Html) -> Html>>,
}

impl<T> Render<T> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// A chain holding a single layer.
    pub fn layer(f: impl Fn(&T, Html) -> Html + 'static) -> Self {
        Self {
            layers: vec![Rc::new(f)],
        }
    }

    /// Concatenate chains; `self`'s layers run first.
    pub fn compose(mut self, mut other: Self) -> Self {
        self.layers.append(&mut other.layers);
        self
    }

    /// Run the chain over the default rendering of `value`.
    pub fn apply(&self, value: &T, default: Html) -> Html {
        self.layers
            .iter()
            .fold(default, |html, layer| layer(value, html))
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<T> Default for Render<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Render<T> {
    fn clone(&self) -> Self {
        Self {
            layers: self.layers.clone(),
        }
    }
}

/// A bundle of AST transforms and render layers.
#[derive(Clone, Default)]
pub struct Extension {
    block_trans: Vec<TransFn<Block<Inlines>>>,
    inline_trans: Vec<TransFn<Inline>>,
    pub(crate) block_render: Render<Block<BlockPayload>>,
    pub(crate) inline_render: Render<Inline>,
}

impl Extension {
    /// The identity extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// An extension that only transforms block nodes.
    pub fn block_trans(f: impl Fn(Block<Inlines>) -> Block<Inlines> + 'static) -> Self {
        Self {
            block_trans: vec![Rc::new(f)],
            ..Self::default()
        }
    }

    /// An extension that only transforms inline nodes.
    pub fn inline_trans(f: impl Fn(Inline) -> Inline + 'static) -> Self {
        Self {
            inline_trans: vec![Rc::new(f)],
            ..Self::default()
        }
    }

    /// An extension that only layers the block renderer.
    pub fn block_render(f: impl Fn(&Block<BlockPayload>, Html) -> Html + 'static) -> Self {
        Self {
            block_render: Render::layer(f),
            ..Self::default()
        }
    }

    /// An extension that only layers the inline renderer.
    pub fn inline_render(f: impl Fn(&Inline, Html) -> Html + 'static) -> Self {
        Self {
            inline_render: Render::layer(f),
            ..Self::default()
        }
    }

    /// Compose two extensions; `self` applies first in every field.
    pub fn compose(mut self, mut other: Self) -> Self {
        self.block_trans.append(&mut other.block_trans);
        self.inline_trans.append(&mut other.inline_trans);
        Self {
            block_trans: self.block_trans,
            inline_trans: self.inline_trans,
            block_render: self.block_render.compose(other.block_render),
            inline_render: self.inline_render.compose(other.inline_render),
        }
    }

    /// True when every field is the identity.
    pub fn is_identity(&self) -> bool {
        self.block_trans.is_empty()
            && self.inline_trans.is_empty()
            && self.block_render.is_empty()
            && self.inline_render.is_empty()
    }

    /// Apply the block transform chain to a tree, children first, so a
    /// parent transform sees already-transformed children.
    pub(crate) fn apply_block_trans(&self, block: Block<Inlines>) -> Block<Inlines> {
        let block = match block {
            Block::Blockquote(children) => Block::Blockquote(
                children
                    .into_iter()
                    .map(|b| self.apply_block_trans(b))
                    .collect(),
            ),
            Block::OrderedList { start, items } => Block::OrderedList {
                start,
                items: items.map(|item| {
                    item.into_iter().map(|b| self.apply_block_trans(b)).collect()
                }),
            },
            Block::UnorderedList(items) => Block::UnorderedList(items.map(|item| {
                item.into_iter().map(|b| self.apply_block_trans(b)).collect()
            })),
            leaf => leaf,
        };
        self.block_trans.iter().fold(block, |b, f| f(b))
    }

    /// Apply the inline transform chain to a node, children first.
    pub(crate) fn apply_inline_trans(&self, inline: Inline) -> Inline {
        let inline = match inline {
            Inline::Emphasis(inner) => Inline::Emphasis(self.apply_inline_trans_all(inner)),
            Inline::Strong(inner) => Inline::Strong(self.apply_inline_trans_all(inner)),
            Inline::Strikeout(inner) => Inline::Strikeout(self.apply_inline_trans_all(inner)),
            Inline::Subscript(inner) => Inline::Subscript(self.apply_inline_trans_all(inner)),
            Inline::Superscript(inner) => Inline::Superscript(self.apply_inline_trans_all(inner)),
            Inline::Link { inner, dest, title } => Inline::Link {
                inner: self.apply_inline_trans_all(inner),
                dest,
                title,
            },
            Inline::Image { alt, src, title } => Inline::Image {
                alt: self.apply_inline_trans_all(alt),
                src,
                title,
            },
            leaf => leaf,
        };
        self.inline_trans.iter().fold(inline, |i, f| f(i))
    }

    fn apply_inline_trans_all(&self, inlines: Vec<Inline>) -> Vec<Inline> {
        inlines
            .into_iter()
            .map(|i| self.apply_inline_trans(i))
            .collect()
    }
}
