//! Structural class extractor for Arma 3 config files
//!
//! Finds the classes of a `config.cpp` / `.hpp` document that set an enabling
//! property (`scope = 2;` by default) at their own nesting level. A property
//! that only appears inside a nested class is attributed to that nested class
//! and never to its ancestors.
//!
//! # Examples
//!
//! ```rust
//! use parser_cfg::{extract, ExclusionSet};
//!
//! let content = r#"
//!     class CfgWeapons {
//!         class ItemCore;
//!         class Rifle_Base : ItemCore {
//!             scope = 0;
//!             class ItemInfo { scope = 2; };
//!         };
//!         class MyRifle : Rifle_Base { scope = 2; };
//!     };
//! "#;
//! let classes = extract(content, Some("CfgWeapons"), &ExclusionSet::default());
//! assert_eq!(classes, vec!["MyRifle"]);
//! ```

mod error;
mod models;
mod parser;
mod query;
mod scanner;

use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;

pub use error::CfgError;
pub use models::*;
pub use parser::{class_header, ClassHeader, HeaderTail};
pub use query::{locate_section, section_boundary, should_include, ClassTree, PropertyMatcher};
pub use scanner::{find_matching_brace, scan, ClassScanner};

static DEFAULT_MATCHER: Lazy<PropertyMatcher> = Lazy::new(|| {
    PropertyMatcher::new(DEFAULT_PROPERTY, DEFAULT_PROPERTY_VALUE)
        .expect("default property pattern is valid")
});

/// Extractor bound to one configuration, reusable across documents
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    matcher: PropertyMatcher,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, CfgError> {
        let matcher = PropertyMatcher::new(&config.property, config.value)?;
        Ok(Self { config, matcher })
    }

    /// Names of the matching classes in first-seen order
    pub fn extract(&self, document: &str) -> Vec<String> {
        self.extract_spans(document)
            .into_iter()
            .map(|span| span.name)
            .collect()
    }

    /// Matching spans in first-seen order
    pub fn extract_spans(&self, document: &str) -> Vec<ClassSpan> {
        extract_spans_with(
            document,
            self.config.section.as_deref(),
            &self.matcher,
            &self.config.exclusions,
        )
    }

    /// Read a file and extract from its content
    pub fn extract_file(&self, path: &Path) -> Result<Vec<String>, CfgError> {
        let content = std::fs::read_to_string(path).map_err(|source| CfgError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.extract(&content))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            config: ExtractorConfig::default(),
            matcher: DEFAULT_MATCHER.clone(),
        }
    }
}

/// Extract classes setting `scope = 2;` at their own level.
///
/// Classes whose header precedes the first `class <section>` are dropped, as
/// are classes named in `exclusions`. A missing section disables that check.
pub fn extract(document: &str, section: Option<&str>, exclusions: &ExclusionSet) -> Vec<String> {
    extract_spans_with(document, section, &DEFAULT_MATCHER, exclusions)
        .into_iter()
        .map(|span| span.name)
        .collect()
}

fn extract_spans_with(
    document: &str,
    section: Option<&str>,
    matcher: &PropertyMatcher,
    exclusions: &ExclusionSet,
) -> Vec<ClassSpan> {
    let boundary = section_boundary(document, section);
    let tree = ClassTree::build(document);
    debug!("Scanned {} class spans, section boundary {:?}", tree.len(), boundary);

    tree.spans()
        .iter()
        .filter(|span| span.terminated)
        .filter(|span| matcher.has_own_property(&tree, span.id))
        .filter(|span| should_include(span, boundary, exclusions))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WEAPONS: &str = "class CfgWeapons { class Base { scope=0; class Child { scope=2; }; }; \
                           class Standalone: Base { scope=2; }; };";

    fn base_only() -> ExclusionSet {
        ["Base"].into_iter().collect()
    }

    #[test]
    fn test_nested_property_attributes_to_child() {
        let result = extract(WEAPONS, Some("CfgWeapons"), &base_only());
        assert_eq!(result, vec!["Child", "Standalone"]);
    }

    #[test]
    fn test_missing_section_keeps_result() {
        let result = extract(WEAPONS, Some("NoSuchSection"), &base_only());
        assert_eq!(result, vec!["Child", "Standalone"]);
    }

    #[test]
    fn test_unclosed_class_is_not_reported() {
        assert!(extract("class Broken {", Some("CfgWeapons"), &ExclusionSet::default()).is_empty());
        assert!(extract("class Broken { scope = 2;", None, &ExclusionSet::default()).is_empty());
    }

    #[test]
    fn test_unclosed_outer_keeps_closed_inner() {
        let document = "class CfgWeapons { class Inner { scope = 2; };";
        assert_eq!(extract(document, Some("CfgWeapons"), &ExclusionSet::default()), vec!["Inner"]);
    }

    #[test]
    fn test_parent_with_only_nested_property_is_dropped() {
        let document = "class CfgWeapons { class Vest { class ItemInfo { scope = 2; }; }; };";
        let result = extract(document, Some("CfgWeapons"), &ExclusionSet::new());
        assert_eq!(result, vec!["ItemInfo"]);
        let result = extract(document, Some("CfgWeapons"), &ExclusionSet::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_class_before_section_is_dropped() {
        let document = r#"
            class CfgPatches { class my_addon { scope = 2; }; };
            class Early { scope = 2; };
            class CfgWeapons { class Late { scope = 2; }; };
        "#;
        let result = extract(document, Some("CfgWeapons"), &ExclusionSet::default());
        assert_eq!(result, vec!["Late"]);
        let result = extract(document, None, &ExclusionSet::default());
        assert_eq!(result, vec!["my_addon", "Early", "Late"]);
    }

    #[test]
    fn test_span_straddling_section_start_is_dropped_by_header_offset() {
        let document = "class Outer { scope = 2; class CfgWeapons { class X { scope = 2; }; }; };";
        assert_eq!(extract(document, Some("CfgWeapons"), &ExclusionSet::new()), vec!["X"]);

        // Outer matches on its own level; only its header offset keeps it out.
        let tree = ClassTree::build(document);
        let outer = &tree.spans()[0];
        assert_eq!(outer.name, "Outer");
        assert!(DEFAULT_MATCHER.has_own_property(&tree, outer.id));
        let boundary = section_boundary(document, Some("CfgWeapons"));
        assert!(boundary.is_some_and(|b| outer.header_start < b && b < outer.body_end));
        assert!(!should_include(outer, boundary, &ExclusionSet::new()));
        assert_eq!(extract(document, None, &ExclusionSet::new()), vec!["Outer", "X"]);
    }

    #[test]
    fn test_exclusion_overrides_match() {
        let document = "class CfgWeapons { scope = 2; \
                        class ItemCore { scope = 2; }; class Hat { scope = 2; }; };";
        let result = extract(document, Some("CfgWeapons"), &ExclusionSet::default());
        assert_eq!(result, vec!["Hat"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let document = "class CfgWeapons { class A { scope = 2; }; class A { scope = 2; }; };";
        assert_eq!(extract(document, Some("CfgWeapons"), &ExclusionSet::new()), vec!["A", "A"]);
    }

    #[test]
    fn test_identical_bodies_use_own_offsets() {
        let document = "class X { scope = 2; }; class CfgWeapons { class X { scope = 2; }; };";
        assert_eq!(extract(document, Some("CfgWeapons"), &ExclusionSet::default()), vec!["X"]);
    }

    #[test]
    fn test_no_classes() {
        assert!(extract("", Some("CfgWeapons"), &ExclusionSet::default()).is_empty());
        assert!(extract("scope = 2;", None, &ExclusionSet::default()).is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let exclusions = base_only();
        let first = extract(WEAPONS, Some("CfgWeapons"), &exclusions);
        let second = extract(WEAPONS, Some("CfgWeapons"), &exclusions);
        assert_eq!(first, second);
    }

    #[test]
    fn test_extractor_with_custom_config() {
        let config = ExtractorConfig {
            section: Some("CfgVehicles".to_string()),
            property: "scopeArsenal".to_string(),
            value: 2,
            exclusions: ExclusionSet::default(),
        };
        let extractor = Extractor::new(config).unwrap();
        let document = "class CfgVehicles { class Bag { scope = 2; scopeArsenal = 2; }; \
                        class Box { scope = 2; }; };";
        assert_eq!(extractor.extract(document), vec!["Bag"]);
    }

    #[test]
    fn test_extract_spans_carry_offsets() {
        let spans = Extractor::default().extract_spans(WEAPONS);
        let names: Vec<_> = spans.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Child", "Standalone"]);
        assert_eq!(spans[1].header_start, WEAPONS.find("class Standalone").unwrap());
        assert_eq!(spans[1].parent_name.as_deref(), Some("Base"));
    }

    #[test]
    fn test_extract_file_reports_path() {
        let err = Extractor::default()
            .extract_file(Path::new("does/not/exist/config.cpp"))
            .unwrap_err();
        assert!(err.to_string().contains("config.cpp"));
    }
}
