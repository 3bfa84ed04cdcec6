//! Unclosed-openers index with cross-tag nesting invalidation.
//!
//! For every tag name, a stack of stream indices of openers that have not
//! been closed yet. Each stack is ascending because indices are only ever
//! pushed in stream order and popped from the end.
//!
//! When `[/t]` matches the latest `t` opener at index `p`, any opener of
//! another name above `p` sits inside the span that just closed without
//! having been closed itself. It can never close validly afterwards, so it
//! is dropped from tracking and stays `Pending`:
//!
//! ```text
//! [b][i]x[/b][/i]
//!  0  1      ^ closes b@0, drops i@1
//!                ^ no `i` left open: orphan, stays text
//! ```
//!
//! This guarantees every matched pair is properly nested, which is what
//! lets the tree builder use a plain stack.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::trace;

/// Per-name stacks of pending opener indices, scoped to one scan.
#[derive(Debug, Default)]
pub struct UnclosedOpeners<'a> {
    open: HashMap<Cow<'a, str>, Vec<usize>>,
}

impl<'a> UnclosedOpeners<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an opener at stream index `index`.
    pub fn push(&mut self, name: Cow<'a, str>, index: usize) {
        let stack = self.open.entry(name).or_default();
        debug_assert!(stack.last().map_or(true, |&last| last < index));
        stack.push(index);
    }

    /// Whether a closer for `name` would match right now.
    pub fn is_open(&self, name: &str) -> bool {
        self.open.get(name).is_some_and(|stack| !stack.is_empty())
    }

    /// Match a closer for `name`, returning the index of the opener it closes.
    ///
    /// Every other name's openers above that index are discarded. Costs one
    /// pass over the names that still have open tags, plus the entries
    /// actually discarded.
    pub fn close(&mut self, name: &str) -> Option<usize> {
        let stack = self.open.get_mut(name)?;
        let opener = stack.pop()?;

        self.open.retain(|other, stack| {
            if other.as_ref() != name {
                while stack.last().is_some_and(|&index| index > opener) {
                    let dropped = stack.pop();
                    trace!(tag = %other, index = ?dropped, closed_by = name, "opener abandoned by enclosing close");
                }
            }
            !stack.is_empty()
        });

        Some(opener)
    }

    /// Number of openers still tracked.
    pub fn len(&self) -> usize {
        self.open.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
