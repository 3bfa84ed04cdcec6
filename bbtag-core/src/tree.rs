//! Output tree and the fold from events to nodes.
//!
//! The fold walks the event stream once and hands each item to a [`Sink`].
//! Two sinks ship with the crate: [`TreeBuilder`] builds a [`Document`],
//! and [`TextCollector`] keeps only the text. Both see exactly the same
//! sequence, so the text-only projection can never disagree with the tree.
//!
//! # Example
//!
//! ```
//! use bbtag_core::{Parser, StandardTags};
//!
//! let doc = Parser::new(&StandardTags).parse("[b]bold[/b] and [i]not closed");
//!
//! let bold = doc.children()[0].as_element().unwrap();
//! assert_eq!(bold.name, "b");
//! assert_eq!(doc.children()[1].as_text(), Some(" and [i]not closed"));
//! ```

use std::borrow::Cow;
use std::convert::Infallible;

use crate::attrs::Attributes;
use crate::event::{Event, OpenTag};

// ============================================================================
// Core Types
// ============================================================================

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a, F = Infallible> {
    /// Text content. Adjacent runs are always merged.
    Text(Cow<'a, str>),
    /// A matched tag pair and everything between.
    Element(Element<'a, F>),
    /// A host node from segmented input.
    Foreign(F),
}

/// A matched tag pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a, F = Infallible> {
    /// Lowercase tag name.
    pub name: Cow<'a, str>,
    pub attrs: Attributes<'a>,
    pub children: Vec<Node<'a, F>>,
}

impl<'a, F> Node<'a, F> {
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element<'a, F>> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// All text under this node, tags stripped. Foreign nodes contribute
    /// nothing.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        match self {
            Node::Text(text) => buf.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(buf);
                }
            }
            Node::Foreign(_) => {}
        }
    }
}

impl<'a, F> Element<'a, F> {
    /// Scalar attribute value: `[url=value]`.
    pub fn value(&self) -> Option<&str> {
        self.attrs.scalar()
    }

    /// Keyed attribute value: `[video width=100]`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    pub fn text(&self) -> String {
        let mut buf = String::new();
        for child in &self.children {
            child.collect_text(&mut buf);
        }
        buf
    }
}

// ============================================================================
// Document
// ============================================================================

/// Top-level result of a parse: the root children in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a, F = Infallible> {
    children: Vec<Node<'a, F>>,
}

/// A document collapsed by arity, for hosts that render one node directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a, F = Infallible> {
    Empty,
    Single(Node<'a, F>),
    Many(Vec<Node<'a, F>>),
}

impl<'a, F> Document<'a, F> {
    pub fn new(children: Vec<Node<'a, F>>) -> Self {
        Document { children }
    }

    pub fn children(&self) -> &[Node<'a, F>] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Node<'a, F>> {
        self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// All text content, tags stripped.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        for child in &self.children {
            child.collect_text(&mut buf);
        }
        buf
    }

    /// A lone child stands for the whole document.
    pub fn collapse(self) -> Content<'a, F> {
        let mut children = self.children;
        match children.len() {
            0 => Content::Empty,
            1 => match children.pop() {
                Some(node) => Content::Single(node),
                None => Content::Empty,
            },
            _ => Content::Many(children),
        }
    }
}

// ============================================================================
// Fold
// ============================================================================

/// Receiver of the folded event stream.
///
/// Only matched openers reach [`Sink::open`]; pending ones arrive as
/// [`Sink::text`] with their raw source. Calls to `open` and `close` are
/// always balanced and properly nested.
pub trait Sink<'a, F> {
    type Output;

    fn text(&mut self, text: &'a str);
    fn open(&mut self, tag: OpenTag<'a>);
    fn close(&mut self);
    fn foreign(&mut self, node: F);
    fn finish(self) -> Self::Output;
}

/// Feed `events` to `sink` in order.
pub fn fold<'a, F, S: Sink<'a, F>>(events: Vec<Event<'a, F>>, mut sink: S) -> S::Output {
    for event in events {
        match event {
            Event::Text(text) => sink.text(text),
            Event::Open(tag) if tag.is_matched() => sink.open(tag),
            Event::Open(tag) => sink.text(tag.raw),
            Event::Close(_) => sink.close(),
            Event::Foreign(node) => sink.foreign(node),
        }
    }
    sink.finish()
}

// ============================================================================
// TreeBuilder (event consumer)
// ============================================================================

/// An element whose closer has not been folded yet.
#[derive(Debug)]
struct Frame<'a, F> {
    name: Cow<'a, str>,
    raw: &'a str,
    attrs: Attributes<'a>,
    children: Vec<Node<'a, F>>,
}

/// Builds a [`Document`] from folded events.
#[derive(Debug)]
pub struct TreeBuilder<'a, F> {
    root: Vec<Node<'a, F>>,
    stack: Vec<Frame<'a, F>>,
}

impl<'a, F> Default for TreeBuilder<'a, F> {
    fn default() -> Self {
        TreeBuilder {
            root: Vec::new(),
            stack: Vec::new(),
        }
    }
}

impl<'a, F> TreeBuilder<'a, F> {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut Vec<Node<'a, F>> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    fn push_text(&mut self, text: Cow<'a, str>) {
        if text.is_empty() {
            return;
        }
        let children = self.current();
        match children.last_mut() {
            Some(Node::Text(prev)) => prev.to_mut().push_str(&text),
            _ => children.push(Node::Text(text)),
        }
    }

    /// Give an unclosed frame back as its raw opener text plus its children.
    fn unwind_frame(&mut self, frame: Frame<'a, F>) {
        self.push_text(Cow::Borrowed(frame.raw));
        for child in frame.children {
            match child {
                Node::Text(text) => self.push_text(text),
                other => self.current().push(other),
            }
        }
    }

    fn close_frame(&mut self) {
        if let Some(frame) = self.stack.pop() {
            let element = Element {
                name: frame.name,
                attrs: frame.attrs,
                children: frame.children,
            };
            self.current().push(Node::Element(element));
        }
    }
}

impl<'a, F> Sink<'a, F> for TreeBuilder<'a, F> {
    type Output = Document<'a, F>;

    fn text(&mut self, text: &'a str) {
        self.push_text(Cow::Borrowed(text));
    }

    fn open(&mut self, tag: OpenTag<'a>) {
        self.stack.push(Frame {
            name: tag.name,
            raw: tag.raw,
            attrs: tag.attrs,
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        self.close_frame();
    }

    fn foreign(&mut self, node: F) {
        self.current().push(Node::Foreign(node));
    }

    fn finish(mut self) -> Document<'a, F> {
        // Streams from the scanner are balanced. An opener left without a
        // close is text, like any pending opener.
        while let Some(frame) = self.stack.pop() {
            self.unwind_frame(frame);
        }
        Document::new(self.root)
    }
}

// ============================================================================
// TextCollector
// ============================================================================

/// Keeps the text of the folded stream and discards all structure.
#[derive(Debug, Default)]
pub struct TextCollector {
    buf: String,
}

impl TextCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a, F> Sink<'a, F> for TextCollector {
    type Output = String;

    fn text(&mut self, text: &'a str) {
        self.buf.push_str(text);
    }

    fn open(&mut self, _tag: OpenTag<'a>) {}

    fn close(&mut self) {}

    fn foreign(&mut self, _node: F) {}

    fn finish(self) -> String {
        self.buf
    }
}

// ============================================================================
// Tests
// ============================================================================
