//! bbtag Core Parser
//!
//! Single-pass matcher for bracket tag markup (`[b]bold[/b]`,
//! `[url=https://x.com]link[/url]`, `[video width=100 height=50]...`).
//! Builds a structural tree and never renders: what an element looks like
//! is the host's business.
//!
//! Malformed markup is never an error. Unknown names, broken attributes,
//! orphan closers and openers that never close all fall back to their
//! literal source text.
//!
//! # Architecture
//!
//! - **registry.rs** - `TagRegistry` lookup, `TagSet`, `StandardTags`
//! - **attrs.rs** - Attribute reader and `Attributes` value type
//! - **scanner.rs** - Left-to-right bracket scanner producing events
//! - **nesting.rs** - Per-name unclosed-opener stacks and invalidation
//! - **event.rs** - Event stream items
//! - **tree.rs** - Output tree and the event fold (`Sink`)
//! - **markup.rs** - Tree back to markup
//! - **parser.rs** - Entry points and segmented input
//! - **span.rs** - Span type
//!
//! # Example
//!
//! ```
//! use bbtag_core::{parse, parse_text_only, StandardTags};
//!
//! let doc = parse("[b][i]x[/b][/i]", &StandardTags);
//! let b = doc.children()[0].as_element().unwrap();
//! assert_eq!(b.text(), "[i]x");
//! assert_eq!(doc.children()[1].as_text(), Some("[/i]"));
//!
//! assert_eq!(parse_text_only("[url=https://x.com]click[/url]", &StandardTags), "click");
//! ```

pub mod attrs;
pub mod event;
pub mod markup;
pub mod nesting;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod span;
pub mod tree;

pub use attrs::Attributes;
pub use event::{CloseTag, Event, OpenState, OpenTag};
pub use nesting::UnclosedOpeners;
pub use parser::{parse, parse_text_only, Parser, Segment};
pub use registry::{RegistryError, StandardTags, TagInfo, TagRegistry, TagSet};
pub use scanner::{scan, Scanner};
pub use span::Span;
pub use tree::{fold, Content, Document, Element, Node, Sink, TextCollector, TreeBuilder};
