//! Single-pass tag scanner.
//!
//! Walks the source left to right looking for `[`. Each candidate bracket
//! is either accepted as a tag event or rejected, in which case scanning
//! resumes one byte after its `[` so that a later `[` inside the rejected
//! text still gets its chance:
//!
//! ```text
//! [[b]x[/b]
//! ^ `[` + `[b` is not a tag name: retry at offset 1
//!  ^ `[b]` opens
//! ```
//!
//! Rejected brackets never produce events; their bytes simply stay part of
//! the surrounding text run. Positions of `[`, `]` and quote characters
//! are found with memoized `memchr` searches, keeping the whole scan
//! linear even on inputs made of nothing but `[`.

use std::borrow::Cow;

use memchr::memchr;
use tracing::trace;

use crate::attrs::{AttributeReader, Attributes, NextByte};
use crate::event::{CloseTag, Event, OpenTag};
use crate::nesting::UnclosedOpeners;
use crate::registry::{TagInfo, TagRegistry};
use crate::span::Span;

/// A bracket that passed syntax and registry checks.
enum Bracket<'a> {
    Open {
        name: Cow<'a, str>,
        info: TagInfo,
        attrs: Attributes<'a>,
        /// Offset just past the tag's `]`.
        end: usize,
    },
    Close {
        name: Cow<'a, str>,
        info: TagInfo,
        end: usize,
    },
}

/// Scanner state for one source segment.
pub struct Scanner<'a, 'r, R: ?Sized> {
    src: &'a str,
    registry: &'r R,
    openers: UnclosedOpeners<'a>,
    attrs: AttributeReader,
    close_bracket: NextByte,
    /// Start of the text run not yet emitted.
    text_start: usize,
    /// Where the next `[` search begins.
    pos: usize,
}

impl<'a, 'r, R: TagRegistry + ?Sized> Scanner<'a, 'r, R> {
    pub fn new(src: &'a str, registry: &'r R) -> Self {
        Scanner {
            src,
            registry,
            openers: UnclosedOpeners::new(),
            attrs: AttributeReader::new(),
            close_bracket: NextByte::new(b']'),
            text_start: 0,
            pos: 0,
        }
    }

    /// Scan the whole segment, appending to `events`.
    ///
    /// Stream indices recorded in `Close` events and opener states are
    /// absolute positions in `events`, so several segments can share one
    /// stream. Matching never crosses segments: each scanner has its own
    /// unclosed-openers index.
    pub fn scan_into<F>(mut self, events: &mut Vec<Event<'a, F>>) {
        let src = self.src;
        let bytes = src.as_bytes();

        while let Some(offset) = memchr(b'[', &bytes[self.pos..]) {
            let open = self.pos + offset;
            let Some(close) = self.close_bracket.find(bytes, open + 1) else {
                // Every later `[` would need a `]` too.
                trace!(at = open, "no `]` left, rest is text");
                break;
            };

            match self.read_bracket(open, close) {
                Some(Bracket::Open { name, info, attrs, end }) => {
                    let end = self.swallow_line_break(end, info);
                    self.flush_text(open, events);
                    let index = events.len();
                    let raw = &src[open..end];
                    events.push(Event::Open(OpenTag::new(
                        name.clone(),
                        attrs,
                        raw,
                        Span::new(open, end),
                    )));
                    self.openers.push(name, index);
                    self.resume_at(end);
                }
                Some(Bracket::Close { name, info, end }) => {
                    let Some(opener) = self.openers.close(&name) else {
                        trace!(at = open, tag = %name, "closing tag without opener");
                        self.pos = open + 1;
                        continue;
                    };
                    let end = self.swallow_line_break(end, info);
                    self.flush_text(open, events);
                    let index = events.len();
                    if let Some(Event::Open(tag)) = events.get_mut(opener) {
                        tag.mark_matched(index);
                    }
                    events.push(Event::Close(CloseTag {
                        opener,
                        span: Span::new(open, end),
                    }));
                    self.resume_at(end);
                }
                None => self.pos = open + 1,
            }
        }

        self.flush_text(src.len(), events);
    }

    /// Classify the bracket at `open`, whose first `]` is at `close`.
    fn read_bracket(&mut self, open: usize, close: usize) -> Option<Bracket<'a>> {
        let src = self.src;
        let bytes = src.as_bytes();
        let closing = bytes.get(open + 1) == Some(&b'/');
        let name_start = if closing { open + 2 } else { open + 1 };

        let name_len = bytes[name_start..close]
            .iter()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        if name_len == 0 {
            return None;
        }
        let name_end = name_start + name_len;
        let name = lowercase(&src[name_start..name_end]);

        let Some(info) = self.registry.lookup(&name) else {
            trace!(at = open, tag = %name, "unknown tag name");
            return None;
        };

        if closing {
            // Closing tags take no attributes.
            if name_end != close {
                trace!(at = open, tag = %name, "junk in closing tag");
                return None;
            }
            return Some(Bracket::Close { name, info, end: close + 1 });
        }

        match self.attrs.read(src, name_end, close) {
            Some((attrs, end)) => Some(Bracket::Open { name, info, attrs, end }),
            None => {
                trace!(at = open, tag = %name, "malformed attributes");
                None
            }
        }
    }

    /// Block tags eat one line break right after their `]`.
    fn swallow_line_break(&self, end: usize, info: TagInfo) -> usize {
        if !info.is_block {
            return end;
        }
        let rest = &self.src.as_bytes()[end..];
        // CRLF is one line break.
        if rest.starts_with(b"\r\n") {
            end + 2
        } else if rest.starts_with(b"\n") {
            end + 1
        } else {
            end
        }
    }

    fn flush_text<F>(&mut self, upto: usize, events: &mut Vec<Event<'a, F>>) {
        if self.text_start < upto {
            let src = self.src;
            events.push(Event::Text(&src[self.text_start..upto]));
        }
        self.text_start = upto;
    }

    fn resume_at(&mut self, end: usize) {
        self.text_start = end;
        self.pos = end;
    }
}

fn lowercase(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Scan `src` into a fresh event stream.
pub fn scan<'a, R: TagRegistry + ?Sized>(src: &'a str, registry: &R) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    Scanner::new(src, registry).scan_into(&mut events);
    events
}
