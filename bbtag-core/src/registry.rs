//! Tag registries: which names are tags, and which of those are block tags.
//!
//! The parser never renders anything. It only needs two answers from the
//! host: "is this name a known tag?" and "is this known tag a block tag?".
//! Both come from a [`TagRegistry`], supplied once at parser construction
//! and never mutated by the parser.
//!
//! Names handed to [`TagRegistry::lookup`] are always lowercase ASCII
//! letters; the scanner case-folds before asking.

use std::collections::HashMap;

use thiserror::Error;

/// What the parser needs to know about a registered tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TagInfo {
    /// Block tags swallow one line break directly after their opener and
    /// after their closer, since the rendered element already breaks the line.
    pub is_block: bool,
}

impl TagInfo {
    pub const INLINE: TagInfo = TagInfo { is_block: false };
    pub const BLOCK: TagInfo = TagInfo { is_block: true };
}

/// Read-only lookup from lowercase tag name to [`TagInfo`].
pub trait TagRegistry {
    fn lookup(&self, name: &str) -> Option<TagInfo>;

    #[inline]
    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    #[inline]
    fn is_block(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|info| info.is_block)
    }
}

impl<R: TagRegistry + ?Sized> TagRegistry for &R {
    #[inline]
    fn lookup(&self, name: &str) -> Option<TagInfo> {
        (**self).lookup(name)
    }
}

/// Errors raised while building a [`TagSet`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid tag name {0:?}: tag names must be one or more ASCII letters")]
    InvalidName(String),

    #[error("tag {0:?} is already registered")]
    Duplicate(String),
}

// ============================================================================
// TagSet (runtime registry)
// ============================================================================

/// A registry assembled at runtime by the host.
///
/// ```
/// use bbtag_core::{TagRegistry, TagSet};
///
/// let tags = TagSet::new().inline("b").unwrap().block("quote").unwrap();
/// assert!(tags.contains("b"));
/// assert!(tags.is_block("quote"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    tags: HashMap<String, TagInfo>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, stored case-folded.
    ///
    /// Only ASCII letters are accepted: the scanner reads tag names as a
    /// maximal run of letters, so any other name could never match.
    pub fn insert(&mut self, name: &str, info: TagInfo) -> Result<(), RegistryError> {
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        let key = name.to_ascii_lowercase();
        if self.tags.contains_key(&key) {
            return Err(RegistryError::Duplicate(key));
        }
        self.tags.insert(key, info);
        Ok(())
    }

    /// Builder form of `insert(name, TagInfo::INLINE)`.
    pub fn inline(mut self, name: &str) -> Result<Self, RegistryError> {
        self.insert(name, TagInfo::INLINE)?;
        Ok(self)
    }

    /// Builder form of `insert(name, TagInfo::BLOCK)`.
    pub fn block(mut self, name: &str) -> Result<Self, RegistryError> {
        self.insert(name, TagInfo::BLOCK)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}

impl TagRegistry for TagSet {
    #[inline]
    fn lookup(&self, name: &str) -> Option<TagInfo> {
        self.tags.get(name).copied()
    }
}

impl<'s> TryFrom<&[(&'s str, TagInfo)]> for TagSet {
    type Error = RegistryError;

    fn try_from(entries: &[(&'s str, TagInfo)]) -> Result<Self, Self::Error> {
        let mut set = TagSet::new();
        for (name, info) in entries {
            set.insert(name, *info)?;
        }
        Ok(set)
    }
}

// ============================================================================
// StandardTags (compile-time registry)
// ============================================================================

static STANDARD_TAGS: phf::Map<&'static str, TagInfo> = phf::phf_map! {
    "b" => TagInfo::INLINE,
    "i" => TagInfo::INLINE,
    "u" => TagInfo::INLINE,
    "s" => TagInfo::INLINE,
    "sub" => TagInfo::INLINE,
    "sup" => TagInfo::INLINE,
    "url" => TagInfo::INLINE,
    "email" => TagInfo::INLINE,
    "img" => TagInfo::INLINE,
    "color" => TagInfo::INLINE,
    "size" => TagInfo::INLINE,
    "font" => TagInfo::INLINE,
    "video" => TagInfo::INLINE,
    "youtube" => TagInfo::INLINE,
    "center" => TagInfo::BLOCK,
    "left" => TagInfo::BLOCK,
    "right" => TagInfo::BLOCK,
    "justify" => TagInfo::BLOCK,
    "quote" => TagInfo::BLOCK,
    "code" => TagInfo::BLOCK,
    "list" => TagInfo::BLOCK,
    "spoiler" => TagInfo::BLOCK,
    "indent" => TagInfo::BLOCK,
};

/// The common BBCode tag vocabulary, resolved through a perfect hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTags;

impl StandardTags {
    pub fn names() -> impl Iterator<Item = &'static str> {
        STANDARD_TAGS.keys().copied()
    }
}

impl TagRegistry for StandardTags {
    #[inline]
    fn lookup(&self, name: &str) -> Option<TagInfo> {
        STANDARD_TAGS.get(name).copied()
    }
}
