use regex::Regex;

use crate::error::CfgError;
use crate::models::{ClassSpan, ExclusionSet, SpanId};
use crate::scanner::scan;

/// All spans of one document, addressable by [`SpanId`]
#[derive(Debug, Clone)]
pub struct ClassTree<'a> {
    document: &'a str,
    spans: Vec<ClassSpan>,
    children: Vec<Vec<SpanId>>,
}

impl<'a> ClassTree<'a> {
    /// Scan the whole document and index the spans
    pub fn build(document: &'a str) -> Self {
        let spans: Vec<ClassSpan> = scan(document, 0).collect();
        let mut children = vec![Vec::new(); spans.len()];
        for span in &spans {
            if let Some(parent) = span.parent {
                children[parent.0].push(span.id);
            }
        }
        Self {
            document,
            spans,
            children,
        }
    }

    pub fn spans(&self) -> &[ClassSpan] {
        &self.spans
    }

    pub fn get(&self, id: SpanId) -> Option<&ClassSpan> {
        self.spans.get(id.0)
    }

    pub fn children(&self, id: SpanId) -> impl Iterator<Item = &ClassSpan> {
        self.children
            .get(id.0)
            .into_iter()
            .flatten()
            .map(move |child| &self.spans[child.0])
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Body of `id` with the full extent of every nested class cut out.
    ///
    /// The pieces are returned separately so that text on both sides of a
    /// nested class is never read as one statement.
    pub fn own_level_segments(&self, id: SpanId) -> Vec<&'a str> {
        let Some(span) = self.get(id) else {
            return Vec::new();
        };

        let mut segments = Vec::new();
        let mut cursor = span.body_start;
        for child in self.children(id) {
            if child.header_start > cursor {
                segments.push(&self.document[cursor..child.header_start]);
            }
            cursor = cursor.max(child.extent_end());
        }
        if span.body_end > cursor {
            segments.push(&self.document[cursor..span.body_end]);
        }
        segments
    }
}

/// Detects an integer property assignment such as `scope = 2;`
#[derive(Debug, Clone)]
pub struct PropertyMatcher {
    pattern: Regex,
}

impl PropertyMatcher {
    pub fn new(property: &str, value: i64) -> Result<Self, CfgError> {
        if property.is_empty() {
            return Err(CfgError::EmptyProperty);
        }
        let pattern = Regex::new(&format!(
            r"\b{}\s*=\s*{}\s*;",
            regex::escape(property),
            regex::escape(&value.to_string())
        ))?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Whether the assignment appears at the own level of `id`
    pub fn has_own_property(&self, tree: &ClassTree<'_>, id: SpanId) -> bool {
        tree.own_level_segments(id)
            .iter()
            .any(|segment| self.is_match(segment))
    }
}

/// Offset of the first literal `class <section>` in the document, or 0
pub fn locate_section(document: &str, section: &str) -> usize {
    document.find(&format!("class {}", section)).unwrap_or(0)
}

/// Boundary for [`should_include`]; `None` when no section is requested
pub fn section_boundary(document: &str, section: Option<&str>) -> Option<usize> {
    section
        .filter(|section| !section.trim().is_empty())
        .map(|section| locate_section(document, section.trim()))
}

/// Final inclusion check for a span that already carries the property
pub fn should_include(
    span: &ClassSpan,
    boundary: Option<usize>,
    exclusions: &ExclusionSet,
) -> bool {
    if exclusions.contains(&span.name) {
        return false;
    }
    if let Some(boundary) = boundary {
        if span.header_start < boundary {
            return false;
        }
    }
    true
}
