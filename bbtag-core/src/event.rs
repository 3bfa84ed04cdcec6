//! Scanner events - the flat stream between the scanner and the tree builder.
//!
//! Only well-formed brackets become tag events. Everything else, including
//! orphan closers, is left inside `Text` runs. An opener that is never
//! matched stays `Pending` and is turned back into its source text when
//! the stream is folded.
//!
//! ```text
//! "[b]x[/b] [i]y"
//!
//! Open  { name: "b", state: Matched(2) }
//! Text  "x"
//! Close { opener: 0 }
//! Text  " "
//! Open  { name: "i", state: Pending }
//! Text  "y"
//! ```

use std::borrow::Cow;
use std::convert::Infallible;

use crate::attrs::Attributes;
use crate::span::Span;

/// One item of the event stream.
///
/// `F` is the host's pre-built node type for segmented input; plain string
/// input never produces `Foreign`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a, F = Infallible> {
    /// Source text outside any recognized tag.
    Text(&'a str),
    /// A well-formed opening tag.
    Open(OpenTag<'a>),
    /// A closing tag that matched an opener.
    Close(CloseTag),
    /// A host node passed through untouched.
    Foreign(F),
}

impl<'a, F> Event<'a, F> {
    pub fn as_open(&self) -> Option<&OpenTag<'a>> {
        match self {
            Event::Open(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Event::Text(_))
    }
}

/// Whether an opener found its closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenState {
    /// Not closed, or abandoned when an enclosing tag closed first.
    Pending,
    /// Closed by the `Close` event at this stream index.
    Matched(usize),
}

/// A well-formed opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag<'a> {
    /// Lowercase tag name.
    pub name: Cow<'a, str>,
    pub attrs: Attributes<'a>,
    /// Exact source text of the tag, including the line break a block
    /// opener swallows.
    pub raw: &'a str,
    pub span: Span,
    state: OpenState,
}

impl<'a> OpenTag<'a> {
    pub fn new(name: Cow<'a, str>, attrs: Attributes<'a>, raw: &'a str, span: Span) -> Self {
        OpenTag {
            name,
            attrs,
            raw,
            span,
            state: OpenState::Pending,
        }
    }

    #[inline]
    pub fn state(&self) -> OpenState {
        self.state
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self.state, OpenState::Matched(_))
    }

    /// `Pending -> Matched(close)`. An opener is matched at most once.
    pub(crate) fn mark_matched(&mut self, close: usize) {
        debug_assert_eq!(self.state, OpenState::Pending, "opener matched twice");
        self.state = OpenState::Matched(close);
    }
}

/// A closing tag and the stream index of the opener it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CloseTag {
    pub opener: usize,
    /// Source span, including a swallowed line break after a block closer.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_tag_transition() {
        let mut tag = OpenTag::new(Cow::Borrowed("b"), Attributes::None, "[b]", Span::new(0, 3));
        assert_eq!(tag.state(), OpenState::Pending);
        assert!(!tag.is_matched());

        tag.mark_matched(4);
        assert_eq!(tag.state(), OpenState::Matched(4));
        assert!(tag.is_matched());
    }

    #[test]
    fn test_event_accessors() {
        let tag = OpenTag::new(Cow::Borrowed("i"), Attributes::None, "[i]", Span::new(0, 3));
        let open: Event<'_> = Event::Open(tag);
        assert_eq!(open.as_open().map(|t| t.name.as_ref()), Some("i"));
        assert!(!open.is_text());

        let text: Event<'_> = Event::Text("hello");
        assert!(text.is_text());
        assert!(text.as_open().is_none());
    }
}
