//! Attribute reader for opening tags.
//!
//! Three shapes follow the tag name:
//!
//! ```text
//! [tag]                      Attributes::None
//! [tag=value]                Attributes::Scalar("value")
//! [tag="a ] b"]              Attributes::Scalar("a ] b")
//! [tag k=v k2="x y"]         Attributes::Keyed([("k", "v"), ("k2", "x y")])
//! ```
//!
//! Unquoted scalar values run to the first `]` and may contain spaces.
//! Unquoted keyed values stop at the first space or `]`. Quoted values
//! run to the matching quote, with no escapes, and may contain `]`.
//! Anything else makes the whole bracket invalid and the scanner falls
//! back to treating it as text.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use memchr::memchr2;

/// Attributes of an opening tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Attributes<'a> {
    #[default]
    None,
    /// `[tag=value]`
    Scalar(Cow<'a, str>),
    /// `[tag a=1 b="2"]`: lowercase keys, unique, in first-seen order.
    Keyed(Vec<(Cow<'a, str>, Cow<'a, str>)>),
}

impl<'a> Attributes<'a> {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Attributes::None)
    }

    /// The scalar value, if this is `[tag=value]`.
    pub fn scalar(&self) -> Option<&str> {
        match self {
            Attributes::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Look up a keyed value. `key` must be lowercase.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Attributes::Keyed(pairs) => pairs
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .map(|(_, v)| v.as_ref()),
            _ => None,
        }
    }

    /// Iterate keyed pairs; empty for `None` and `Scalar`.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        let pairs = match self {
            Attributes::Keyed(pairs) => pairs.as_slice(),
            _ => &[],
        };
        pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    /// Detach from the source buffer.
    pub fn into_owned(self) -> Attributes<'static> {
        match self {
            Attributes::None => Attributes::None,
            Attributes::Scalar(v) => Attributes::Scalar(Cow::Owned(v.into_owned())),
            Attributes::Keyed(pairs) => Attributes::Keyed(
                pairs
                    .into_iter()
                    .map(|(k, v)| (Cow::Owned(k.into_owned()), Cow::Owned(v.into_owned())))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// Byte finder
// ============================================================================

/// Memoized "next occurrence of `byte` at or after `at`".
///
/// The scanner retries one byte after every rejected bracket. Without the
/// memo, input such as `[[[[...` with no `]` anywhere would rescan the
/// tail once per `[` and go quadratic. A query that falls between the last
/// search origin and the last hit is answered without touching the input.
#[derive(Debug, Clone)]
pub(crate) struct NextByte {
    byte: u8,
    from: usize,
    found: Option<usize>,
}

impl NextByte {
    pub(crate) fn new(byte: u8) -> Self {
        NextByte { byte, from: usize::MAX, found: None }
    }

    pub(crate) fn find(&mut self, haystack: &[u8], at: usize) -> Option<usize> {
        if at >= self.from {
            match self.found {
                Some(found) if at <= found => return Some(found),
                None => return None,
                Some(_) => {}
            }
        }
        let found = haystack
            .get(at..)
            .and_then(|rest| memchr::memchr(self.byte, rest))
            .map(|offset| at + offset);
        self.from = at;
        self.found = found;
        found
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Parses the attribute portion of opening tags.
///
/// One reader lives for one scan so its quote finders stay warm across
/// brackets.
///
/// Reading keyed pairs from a given offset depends on nothing but the
/// source, so a bracket whose pairs run into the pair offsets of an
/// earlier failed bracket fails the same way. `dead_keys` holds those
/// offsets; each offset is read at most once per scan.
#[derive(Debug, Clone)]
pub(crate) struct AttributeReader {
    double: NextByte,
    single: NextByte,
    dead_keys: HashSet<usize>,
}

impl AttributeReader {
    pub(crate) fn new() -> Self {
        AttributeReader {
            double: NextByte::new(b'"'),
            single: NextByte::new(b'\''),
            dead_keys: HashSet::new(),
        }
    }

    /// Read attributes starting right after the tag name at `at`.
    ///
    /// `close` is the first `]` after the tag's `[`. Returns the attributes
    /// and the offset just past the tag's own `]`, which lies beyond
    /// `close` when a quoted value contains `]`. `None` means the bracket
    /// is not a valid tag.
    pub(crate) fn read<'a>(
        &mut self,
        src: &'a str,
        at: usize,
        close: usize,
    ) -> Option<(Attributes<'a>, usize)> {
        let bytes = src.as_bytes();
        match bytes.get(at)? {
            b']' => Some((Attributes::None, at + 1)),
            b'=' => self.read_scalar(src, at + 1, close),
            b' ' => self.read_keyed(src, at + 1),
            _ => None,
        }
    }

    fn read_scalar<'a>(
        &mut self,
        src: &'a str,
        start: usize,
        close: usize,
    ) -> Option<(Attributes<'a>, usize)> {
        let bytes = src.as_bytes();
        if let Some(&quote @ (b'"' | b'\'')) = bytes.get(start) {
            let end = self.closing_quote(bytes, quote, start + 1)?;
            if bytes.get(end + 1) != Some(&b']') {
                return None;
            }
            let value = &src[start + 1..end];
            return Some((Attributes::Scalar(Cow::Borrowed(value)), end + 2));
        }
        // `start <= close` holds: `=` sits before the first `]`.
        let value = &src[start..close];
        Some((Attributes::Scalar(Cow::Borrowed(value)), close + 1))
    }

    fn read_keyed<'a>(&mut self, src: &'a str, start: usize) -> Option<(Attributes<'a>, usize)> {
        let mut visited = Vec::new();
        let result = self.read_pairs(src, start, &mut visited);
        if result.is_none() {
            self.dead_keys.extend(visited);
        }
        result
    }

    fn read_pairs<'a>(
        &mut self,
        src: &'a str,
        start: usize,
        visited: &mut Vec<usize>,
    ) -> Option<(Attributes<'a>, usize)> {
        let bytes = src.as_bytes();
        let mut pairs = Pairs::default();
        let mut pos = start;

        let end = loop {
            if bytes.get(pos) == Some(&b']') {
                break pos + 1;
            }
            if self.dead_keys.contains(&pos) {
                return None;
            }
            visited.push(pos);

            let key_len = bytes[pos..].iter().take_while(|&&b| is_key_byte(b)).count();
            if key_len == 0 {
                return None;
            }
            let key_end = pos + key_len;
            if bytes.get(key_end) != Some(&b'=') {
                return None;
            }

            let (value, after) = self.read_keyed_value(src, key_end + 1)?;
            pairs.insert(lowercase(&src[pos..key_end]), value);

            match bytes.get(after) {
                Some(b' ') => pos = after + 1,
                Some(b']') => break after + 1,
                _ => return None,
            }
        };

        if pairs.is_empty() {
            // `[tag ]` carries nothing worth distinguishing from `[tag]`.
            return Some((Attributes::None, end));
        }
        Some((Attributes::Keyed(pairs.into_vec()), end))
    }

    /// Returns the value and the offset of the byte that terminated it.
    fn read_keyed_value<'a>(&mut self, src: &'a str, start: usize) -> Option<(Cow<'a, str>, usize)> {
        let bytes = src.as_bytes();
        if let Some(&quote @ (b'"' | b'\'')) = bytes.get(start) {
            let end = self.closing_quote(bytes, quote, start + 1)?;
            return Some((Cow::Borrowed(&src[start + 1..end]), end + 1));
        }
        let end = start + memchr2(b' ', b']', bytes.get(start..)?)?;
        Some((Cow::Borrowed(&src[start..end]), end))
    }

    fn closing_quote(&mut self, bytes: &[u8], quote: u8, at: usize) -> Option<usize> {
        match quote {
            b'"' => self.double.find(bytes, at),
            _ => self.single.find(bytes, at),
        }
    }
}

#[inline]
fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn lowercase(key: &str) -> Cow<'_, str> {
    if key.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(key.to_ascii_lowercase())
    } else {
        Cow::Borrowed(key)
    }
}

/// Keyed pairs under construction.
///
/// Last write wins; the key keeps the position where it first appeared.
#[derive(Default)]
struct Pairs<'a> {
    pairs: Vec<(Cow<'a, str>, Cow<'a, str>)>,
    index: HashMap<Cow<'a, str>, usize>,
}

impl<'a> Pairs<'a> {
    fn insert(&mut self, key: Cow<'a, str>, value: Cow<'a, str>) {
        match self.index.get(&key) {
            Some(&slot) => self.pairs[slot].1 = value,
            None => {
                self.index.insert(key.clone(), self.pairs.len());
                self.pairs.push((key, value));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn into_vec(self) -> Vec<(Cow<'a, str>, Cow<'a, str>)> {
        self.pairs
    }
}
