//! Parser entry points.
//!
//! A [`Parser`] is a borrowed registry and nothing else. Every call builds
//! its own event stream and unclosed-openers index and drops both before
//! returning, so one parser can serve any number of threads as long as the
//! registry is `Sync`.

use std::convert::Infallible;

use tracing::debug;

use crate::event::Event;
use crate::registry::TagRegistry;
use crate::scanner::Scanner;
use crate::tree::{fold, Document, Sink, TextCollector, TreeBuilder};

/// One piece of pre-segmented input.
///
/// Hosts that already split their content (for instance around sanitized
/// inline HTML) pass markup strings and finished nodes interleaved. Each
/// `Markup` segment is scanned on its own; tags never pair up across a
/// segment boundary, and `Foreign` nodes are never looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a, F = Infallible> {
    Markup(&'a str),
    Foreign(F),
}

/// Bracket tag parser over a tag registry.
pub struct Parser<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: ?Sized> Clone for Parser<'r, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'r, R: ?Sized> Copy for Parser<'r, R> {}

impl<'r, R: TagRegistry + ?Sized> Parser<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Parser { registry }
    }

    pub fn registry(&self) -> &'r R {
        self.registry
    }

    /// The raw event stream for `source`.
    pub fn scan<'a>(&self, source: &'a str) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        Scanner::new(source, self.registry).scan_into(&mut events);
        events
    }

    /// Parse `source` into a tree.
    pub fn parse<'a>(&self, source: &'a str) -> Document<'a> {
        self.run(self.scan(source), TreeBuilder::new())
    }

    /// Parse `source` and keep only its text: matched tags are removed,
    /// anything that did not form a tag stays verbatim.
    pub fn parse_text_only(&self, source: &str) -> String {
        self.run(self.scan(source), TextCollector::new())
    }

    /// Parse pre-segmented input into one tree.
    pub fn parse_segments<'a, F, I>(&self, segments: I) -> Document<'a, F>
    where
        I: IntoIterator<Item = Segment<'a, F>>,
    {
        self.run(self.scan_segments(segments), TreeBuilder::new())
    }

    /// Text-only projection of pre-segmented input.
    pub fn text_only_segments<'a, F, I>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = Segment<'a, F>>,
    {
        self.run(self.scan_segments(segments), TextCollector::new())
    }

    fn scan_segments<'a, F, I>(&self, segments: I) -> Vec<Event<'a, F>>
    where
        I: IntoIterator<Item = Segment<'a, F>>,
    {
        let mut events = Vec::new();
        for segment in segments {
            match segment {
                Segment::Markup(source) => Scanner::new(source, self.registry).scan_into(&mut events),
                Segment::Foreign(node) => events.push(Event::Foreign(node)),
            }
        }
        events
    }

    fn run<'a, F, S: Sink<'a, F>>(&self, events: Vec<Event<'a, F>>, sink: S) -> S::Output {
        let mut tags = 0;
        let mut pending = 0;
        for event in &events {
            if let Event::Open(tag) = event {
                tags += 1;
                if !tag.is_matched() {
                    pending += 1;
                }
            }
        }
        debug!(events = events.len(), tags, unmatched = pending, "folding event stream");
        fold(events, sink)
    }
}

/// Parse `source` with `registry`.
pub fn parse<'a, R: TagRegistry + ?Sized>(source: &'a str, registry: &R) -> Document<'a> {
    Parser::new(registry).parse(source)
}

/// Strip all tags from `source`, keeping its text.
pub fn parse_text_only<R: TagRegistry + ?Sized>(source: &str, registry: &R) -> String {
    Parser::new(registry).parse_text_only(source)
}
