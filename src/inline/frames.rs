//! Flanking delimiter runs and enclosed inlines.
//!
//! A run of `*`, `_`, `~`, or `^` opens when it is left-flanking under the
//! `Space < Punct < Other` order and closes when it is right-flanking.
//! Openers are matched longest first, so `***` is a double frame
//! (strong around emphasis) rather than emphasis inside emphasis. A
//! left-flanking run whose enclosed parse cannot complete backtracks and
//! is consumed literally; a run that can only close, with nothing to
//! close, is a reported non-flanking error.

use crate::ast::Inline;
use crate::error::ErrorKind;
use crate::lexing::CharType;

use super::{push_inline, Attempt, Backtrack, InlineParser, Stop};

/// One emphasis-like wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    Emphasis,
    Strong,
    Strikeout,
    Subscript,
    Superscript,
}

impl Frame {
    /// Delimiter width of the frame.
    fn width(self) -> usize {
        match self {
            Frame::Emphasis | Frame::Subscript | Frame::Superscript => 1,
            Frame::Strong | Frame::Strikeout => 2,
        }
    }

    fn wrap(self, inner: Vec<Inline>) -> Inline {
        match self {
            Frame::Emphasis => Inline::Emphasis(inner),
            Frame::Strong => Inline::Strong(inner),
            Frame::Strikeout => Inline::Strikeout(inner),
            Frame::Subscript => Inline::Subscript(inner),
            Frame::Superscript => Inline::Superscript(inner),
        }
    }
}

/// What a delimiter run opens, longest match first.
enum Opener {
    Single(Frame),
    Double { outer: Frame, inner: Frame },
}

/// Pick the opener for a run of `avail` copies of `ch`.
fn opener_for(ch: char, avail: usize) -> (usize, Opener) {
    match ch {
        '^' => (1, Opener::Single(Frame::Superscript)),
        '*' | '_' => match avail {
            1 => (1, Opener::Single(Frame::Emphasis)),
            2 => (2, Opener::Single(Frame::Strong)),
            3 => (
                3,
                Opener::Double {
                    outer: Frame::Strong,
                    inner: Frame::Emphasis,
                },
            ),
            _ => (
                4,
                Opener::Double {
                    outer: Frame::Strong,
                    inner: Frame::Strong,
                },
            ),
        },
        '~' => match avail {
            1 => (1, Opener::Single(Frame::Subscript)),
            2 => (2, Opener::Single(Frame::Strikeout)),
            3 => (
                3,
                Opener::Double {
                    outer: Frame::Strikeout,
                    inner: Frame::Subscript,
                },
            ),
            _ => (
                4,
                Opener::Double {
                    outer: Frame::Strikeout,
                    inner: Frame::Strikeout,
                },
            ),
        },
        _ => unreachable!("not a frame char: {ch}"),
    }
}

impl InlineParser<'_> {
    /// True when a run at the cursor can close a frame of `len` copies of
    /// `ch`: enough delimiters, and right-flanking past them.
    pub(crate) fn at_frame_close(&self, ch: char, len: usize) -> bool {
        self.run_length(ch) >= len && self.last > self.class_at(self.pos + len)
    }

    fn consume_frame_delims(&mut self, len: usize) {
        self.pos += len;
        self.last = CharType::Punct;
    }

    /// Dispatcher entry for a frame character.
    pub(crate) fn handle_frame(&mut self, out: &mut Vec<Inline>) {
        let ch = self.peek().expect("frame char present");
        let run = self.run_length(ch);
        let (opener_len, opener) = opener_for(ch, run);
        let left_flanking = self.last < self.class_at(self.pos + opener_len);

        if left_flanking {
            let snapshot = self.snapshot();
            self.consume_frame_delims(opener_len);
            let attempt = match opener {
                Opener::Single(frame) => self.attempt_single(frame, ch),
                Opener::Double { outer, inner } => self.attempt_double(outer, inner, ch),
            };
            match attempt {
                Ok(inline) => {
                    push_inline(out, inline);
                    return;
                }
                Err(Backtrack) => self.restore(snapshot),
            }
        } else if self.last > self.class_at(self.pos + run) {
            // Can only close, and nothing here is open to close.
            let offset = self.source_offset();
            self.report(
                offset,
                ErrorKind::NonFlankingDelimiterRun(ch.to_string().repeat(run)),
            );
        }

        // Literal fallback: the whole run becomes text.
        self.pos += run * ch.len_utf8();
        self.last = CharType::Punct;
        push_inline(out, Inline::Plain(ch.to_string().repeat(run)));
    }

    fn attempt_single(&mut self, frame: Frame, ch: char) -> Attempt<Inline> {
        let len = frame.width();
        let inner = self.inline_seq(&Stop::Frame { ch, len })?;
        if inner.is_empty() {
            return Err(Backtrack);
        }
        self.consume_frame_delims(len);
        Ok(frame.wrap(inner))
    }

    /// Double frame: both frames open together; the closing side decides
    /// which one closes first by the length of the closing run.
    fn attempt_double(&mut self, outer: Frame, inner: Frame, ch: char) -> Attempt<Inline> {
        let inner_len = inner.width();
        let outer_len = outer.width();
        let first = self.inline_seq(&Stop::EitherFrame {
            ch,
            inner: inner_len,
            outer: outer_len,
        })?;
        if first.is_empty() {
            return Err(Backtrack);
        }

        let run = self.run_length(ch);
        let mut close_inner_first = run >= inner_len + outer_len || run != outer_len;
        // The preferred side still has to be right-flanking here.
        if close_inner_first && !self.at_frame_close(ch, inner_len) {
            close_inner_first = false;
        } else if !close_inner_first && !self.at_frame_close(ch, outer_len) {
            close_inner_first = true;
        }
        let (this, this_len, that, that_len) = if close_inner_first {
            (inner, inner_len, outer, outer_len)
        } else {
            (outer, outer_len, inner, inner_len)
        };

        self.consume_frame_delims(this_len);
        let wrapped = this.wrap(first);
        let mut rest = self.inline_seq(&Stop::Frame { ch, len: that_len })?;
        self.consume_frame_delims(that_len);

        let mut all = Vec::with_capacity(rest.len() + 1);
        all.push(wrapped);
        all.append(&mut rest);
        Ok(that.wrap(all))
    }
}
