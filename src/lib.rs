//! # sternmark
//!
//! A strict markdown processor. Input is parsed in two phases (block
//! structure first, then inline content within each block) into an
//! immutable AST, and rendered to HTML through a layered, extensible
//! pipeline. Unlike permissive dialects, ambiguous constructs are
//! rejected with precise, byte-accurate error locations, and all errors
//! in a document are reported together.
//!
//! Supported beyond CommonMark's core: pipe tables, strikeout,
//! subscript/superscript, and YAML front matter.
//!
//! ## Parsing and rendering
//!
//! ```rust
//! let doc = sternmark::parse("greeting.md", "# Hi\n").unwrap();
//! assert_eq!(doc.render().as_str(), "<h1 id=\"hi\">Hi</h1>\n");
//! ```
//!
//! ## Errors
//!
//! ```rust
//! let err = sternmark::parse("bad.md", "look &nosuch; here").unwrap_err();
//! assert_eq!(err.to_string(), "bad.md:1:6: unknown HTML entity name: nosuch");
//! ```
//!
//! ## Extensions
//!
//! Extensions bundle AST transforms with render layers and compose
//! associatively; the identity extension changes nothing.
//!
//! ```rust
//! use sternmark::{Extension, Html, Inline};
//!
//! // Wrap every code span in a custom element.
//! let ext = Extension::inline_render(|inline, html| match inline {
//!     Inline::CodeSpan(_) => Html::raw(format!("<kbd>{html}</kbd>")),
//!     _ => html,
//! });
//! let doc = sternmark::parse("k.md", "press `q`\n").unwrap().with_extension(ext);
//! assert_eq!(
//!     doc.render().as_str(),
//!     "<p>press <kbd><code>q</code></kbd></p>\n"
//! );
//! ```

pub mod ast;
mod block;
mod document;
pub mod error;
pub mod extension;
mod inline;
mod lexing;
pub mod location;
pub mod reference;
pub mod render;
mod scanner;
pub mod uri;

pub use ast::{plain_text, Block, CellAlign, HeadingLevel, Inline, Inlines, NonEmpty};
pub use document::{parse, Document};
pub use error::{ErrorKind, ParseBundle, ParseError};
pub use extension::{Extension, Render};
pub use render::{escape_html, header_id, Html};
pub use scanner::run_scanner;
pub use uri::Uri;
