//! HTML rendering.
//!
//! Rendering walks the resolved AST bottom-up: inline payloads are
//! rendered first (keeping the original inline sequence alongside, so
//! block render hooks can inspect structure), then each block goes
//! through the layered render chain on top of the defaults below. The
//! output is a document fragment; there is no `<html>`/`<body>` wrapper.

mod html;
mod slug;

pub use html::{escape_html, Html};
pub use slug::header_id;

use crate::ast::{plain_text, Block, CellAlign, Inline, Inlines};
use crate::document::Document;
use crate::extension::Extension;

type Prepared = Block<(Inlines, Html)>;

/// Render a whole document to an HTML fragment.
pub fn render(doc: &Document) -> Html {
    let ext = doc.extension();
    let mut out = Html::new();
    for block in doc.blocks() {
        let transformed = ext.apply_block_trans(block.clone());
        out.push_html(&render_block(&transformed, ext));
    }
    out
}

fn render_block(block: &Block<Inlines>, ext: &Extension) -> Html {
    let prepared: Prepared = block.clone().map(&mut |inlines: Inlines| {
        let transformed = inlines.map(|inline| ext.apply_inline_trans(inline));
        let html = render_inlines(transformed.as_slice(), ext);
        (transformed, html)
    });
    apply_block_render(&prepared, ext)
}

fn apply_block_render(block: &Prepared, ext: &Extension) -> Html {
    let default = default_block_render(block, ext);
    ext.block_render.apply(block, default)
}

/// The default block renderer. Every block-level element ends with a
/// newline; `Naked` content has no wrapper and no newline of its own.
fn default_block_render(block: &Prepared, ext: &Extension) -> Html {
    let mut out = Html::new();
    match block {
        Block::ThematicBreak => out.push_raw("<hr/>\n"),
        Block::Heading(level, (ois, inner)) => {
            let id = header_id(&plain_text(ois.as_slice()));
            out.push_raw("<");
            out.push_raw(level.tag());
            out.push_raw(" id=\"");
            out.push_escaped(&id);
            out.push_raw("\">");
            out.push_html(inner);
            out.push_raw("</");
            out.push_raw(level.tag());
            out.push_raw(">\n");
        }
        Block::CodeBlock { info, content } => {
            out.push_raw("<pre><code");
            if let Some(info) = info {
                let language = info.split_whitespace().next().unwrap_or("");
                out.push_raw(" class=\"language-");
                out.push_escaped(language);
                out.push_raw("\"");
            }
            out.push_raw(">");
            out.push_escaped(content);
            out.push_raw("</code></pre>\n");
        }
        Block::Naked((_, inner)) => out.push_html(inner),
        Block::Paragraph((_, inner)) => {
            out.push_raw("<p>");
            out.push_html(inner);
            out.push_raw("</p>\n");
        }
        Block::Blockquote(children) => {
            out.push_raw("<blockquote>\n");
            for child in children {
                out.push_html(&apply_block_render(child, ext));
            }
            out.push_raw("</blockquote>\n");
        }
        Block::OrderedList { start, items } => {
            if *start == 1 {
                out.push_raw("<ol>\n");
            } else {
                out.push_raw("<ol start=\"");
                out.push_raw(&start.to_string());
                out.push_raw("\">\n");
            }
            for item in items {
                out.push_html(&render_list_item(item, ext));
            }
            out.push_raw("</ol>\n");
        }
        Block::UnorderedList(items) => {
            out.push_raw("<ul>\n");
            for item in items {
                out.push_html(&render_list_item(item, ext));
            }
            out.push_raw("</ul>\n");
        }
        Block::Table { aligns, rows } => {
            out.push_raw("<table>\n<thead>\n<tr>\n");
            let header = rows.first();
            for (cell, align) in header.iter().zip(aligns.iter()) {
                table_cell(&mut out, "th", *align, &cell.1);
            }
            out.push_raw("</tr>\n</thead>\n");
            if rows.len() > 1 {
                out.push_raw("<tbody>\n");
                for row in rows.iter().skip(1) {
                    out.push_raw("<tr>\n");
                    for (cell, align) in row.iter().zip(aligns.iter()) {
                        table_cell(&mut out, "td", *align, &cell.1);
                    }
                    out.push_raw("</tr>\n");
                }
                out.push_raw("</tbody>\n");
            }
            out.push_raw("</table>\n");
        }
    }
    out
}

/// Tight items sit on one line; an item that opens with block content
/// (wrapped paragraphs, nested containers) gets the multi-line form.
fn render_list_item(children: &[Prepared], ext: &Extension) -> Html {
    let mut inner = Html::new();
    for child in children {
        inner.push_html(&apply_block_render(child, ext));
    }
    let block_shaped = inner.as_str().starts_with('<') && inner.ends_with("\n");
    let mut out = Html::new();
    out.push_raw(if block_shaped { "<li>\n" } else { "<li>" });
    out.push_html(&inner);
    out.push_raw("</li>\n");
    out
}

fn table_cell(out: &mut Html, tag: &str, align: CellAlign, content: &Html) {
    out.push_raw("<");
    out.push_raw(tag);
    match align {
        CellAlign::Default => {}
        CellAlign::Left => out.push_raw(" style=\"text-align:left\""),
        CellAlign::Right => out.push_raw(" style=\"text-align:right\""),
        CellAlign::Center => out.push_raw(" style=\"text-align:center\""),
    }
    out.push_raw(">");
    out.push_html(content);
    out.push_raw("</");
    out.push_raw(tag);
    out.push_raw(">\n");
}

/// Render an inline sequence through the layered chain.
pub(crate) fn render_inlines(inlines: &[Inline], ext: &Extension) -> Html {
    let mut out = Html::new();
    for inline in inlines {
        out.push_html(&apply_inline_render(inline, ext));
    }
    out
}

fn apply_inline_render(inline: &Inline, ext: &Extension) -> Html {
    let default = default_inline_render(inline, ext);
    ext.inline_render.apply(inline, default)
}

fn default_inline_render(inline: &Inline, ext: &Extension) -> Html {
    let mut out = Html::new();
    match inline {
        Inline::Plain(text) => out.push_escaped(text),
        Inline::LineBreak => out.push_raw("<br/>"),
        Inline::Emphasis(inner) => wrap_tag(&mut out, "em", inner, ext),
        Inline::Strong(inner) => wrap_tag(&mut out, "strong", inner, ext),
        Inline::Strikeout(inner) => wrap_tag(&mut out, "del", inner, ext),
        Inline::Subscript(inner) => wrap_tag(&mut out, "sub", inner, ext),
        Inline::Superscript(inner) => wrap_tag(&mut out, "sup", inner, ext),
        Inline::CodeSpan(content) => {
            out.push_raw("<code>");
            out.push_escaped(content);
            out.push_raw("</code>");
        }
        Inline::Link { inner, dest, title } => {
            out.push_raw("<a href=\"");
            out.push_escaped(dest.as_str());
            out.push_raw("\"");
            if let Some(title) = title {
                out.push_raw(" title=\"");
                out.push_escaped(title);
                out.push_raw("\"");
            }
            out.push_raw(">");
            out.push_html(&render_inlines(inner, ext));
            out.push_raw("</a>");
        }
        Inline::Image { alt, src, title } => {
            out.push_raw("<img alt=\"");
            out.push_escaped(&plain_text(alt));
            out.push_raw("\" src=\"");
            out.push_escaped(src.as_str());
            out.push_raw("\"");
            if let Some(title) = title {
                out.push_raw(" title=\"");
                out.push_escaped(title);
                out.push_raw("\"");
            }
            out.push_raw("/>");
        }
    }
    out
}

fn wrap_tag(out: &mut Html, tag: &str, inner: &[Inline], ext: &Extension) {
    out.push_raw("<");
    out.push_raw(tag);
    out.push_raw(">");
    out.push_html(&render_inlines(inner, ext));
    out.push_raw("</");
    out.push_raw(tag);
    out.push_raw(">");
}
