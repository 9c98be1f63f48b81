//! Core data structures for structural class extraction

use std::collections::HashSet;
use std::fmt;

/// Base classes and section tokens that are never reported as items
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "ItemCore",
    "InventoryItem_Base_F",
    "HeadgearItem",
    "CfgWeapons",
    "CfgPatches",
    "ItemInfo",
    "XtdGearInfo",
];

pub const DEFAULT_SECTION: &str = "CfgWeapons";
pub const DEFAULT_PROPERTY: &str = "scope";
pub const DEFAULT_PROPERTY_VALUE: i64 = 2;

/// Index of a span inside the arena produced by a single scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanId(pub usize);

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A class definition located in a document by absolute byte offsets.
///
/// `body_start` is the offset just past the opening brace and `body_end` the
/// offset of the matching closing brace. When the body never closes,
/// `body_end` is the end of the enclosing region and `terminated` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpan {
    pub id: SpanId,
    pub name: String,
    /// Class named after `:` in the header, if any
    pub parent_name: Option<String>,
    pub header_start: usize,
    pub body_start: usize,
    pub body_end: usize,
    /// Enclosing span, if this class is nested
    pub parent: Option<SpanId>,
    pub depth: usize,
    pub terminated: bool,
}

impl ClassSpan {
    /// End of the full extent, header through closing brace
    pub fn extent_end(&self) -> usize {
        if self.terminated {
            self.body_end + 1
        } else {
            self.body_end
        }
    }

    /// Body text between the braces
    pub fn body<'a>(&self, document: &'a str) -> &'a str {
        &document[self.body_start..self.body_end]
    }

    pub fn contains(&self, other: &ClassSpan) -> bool {
        self.header_start <= other.header_start && other.extent_end() <= self.extent_end()
    }
}

impl fmt::Display for ClassSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        if let Some(parent) = &self.parent_name {
            write!(f, " : {}", parent)?;
        }
        write!(f, " [{}..{}]", self.header_start, self.extent_end())
    }
}

/// Identifiers that must never be reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<String>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        DEFAULT_EXCLUSIONS.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// Parameters of one extraction pass
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Section whose start bounds the eligible classes; `None` disables the check
    pub section: Option<String>,
    /// Name of the enabling property
    pub property: String,
    /// Integer value the property must be assigned
    pub value: i64,
    pub exclusions: ExclusionSet,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            section: Some(DEFAULT_SECTION.to_string()),
            property: DEFAULT_PROPERTY.to_string(),
            value: DEFAULT_PROPERTY_VALUE,
            exclusions: ExclusionSet::default(),
        }
    }
}
