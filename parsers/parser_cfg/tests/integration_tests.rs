use std::path::PathBuf;

use log::debug;
use parser_cfg::{
    extract, scan, ClassTree, ExclusionSet, Extractor, ExtractorConfig, PropertyMatcher,
};
use pretty_assertions::assert_eq;

fn init() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_config_fixture_extraction() {
    init();
    let classes = Extractor::default()
        .extract_file(&fixture("config.cpp"))
        .expect("Failed to read config.cpp");
    debug!("Extracted {:?}", classes);

    assert_eq!(classes, vec!["tac_cap_black", "tac_cap_olive", "tac_vest_plate"]);
}

#[test]
fn test_config_fixture_without_section_or_exclusions() {
    init();
    let content = std::fs::read_to_string(fixture("config.cpp")).unwrap();
    let config = ExtractorConfig {
        section: None,
        exclusions: ExclusionSet::new(),
        ..Default::default()
    };
    let classes = Extractor::new(config).unwrap().extract(&content);

    assert_eq!(
        classes,
        vec![
            "tac_gear_patch",
            "ItemInfo",
            "tac_cap_black",
            "tac_cap_olive",
            "tac_vest_plate",
            "XtdGearInfo",
        ]
    );
}

#[test]
fn test_every_span_is_nested_or_disjoint() {
    let content = std::fs::read_to_string(fixture("config.cpp")).unwrap();
    let spans: Vec<_> = scan(&content, 0).collect();
    assert!(spans.iter().all(|span| span.terminated));
    assert!(spans
        .iter()
        .all(|span| span.header_start <= span.body_start && span.body_start <= span.body_end));
    assert!(spans.iter().all(|span| span.body_end <= content.len()));

    for (i, a) in spans.iter().enumerate() {
        for b in &spans[i + 1..] {
            assert!(
                a.contains(b) || a.extent_end() <= b.header_start,
                "{} and {} overlap",
                a,
                b
            );
        }
    }
}

#[test]
fn test_naive_scan_would_over_match() {
    let content = "class CfgWeapons { class Holder { class Nested { scope = 2; }; }; };";
    let tree = ClassTree::build(content);
    let matcher = PropertyMatcher::new("scope", 2).unwrap();
    let holder = &tree.spans()[1];

    assert!(matcher.is_match(holder.body(content)));
    assert!(!matcher.has_own_property(&tree, holder.id));
    assert_eq!(extract(content, Some("CfgWeapons"), &ExclusionSet::new()), vec!["Nested"]);
}

#[test]
fn test_result_bounded_by_header_count() {
    let content = std::fs::read_to_string(fixture("config.cpp")).unwrap();
    let headers = content.matches("class ").count();
    let result = extract(&content, None, &ExclusionSet::new());
    assert!(result.len() <= headers);
}

#[test]
fn test_garbage_input_degrades_gracefully() {
    let inputs = [
        "}}}} class A { scope = 2; }; {{{{",
        "class class class {{{ ;;; }}}",
        "class A : { scope = 2; };",
        "class \u{00e9}t\u{00e9} { scope = 2; };",
        "/* class Hidden { scope = 2; }; */",
    ];
    for input in inputs {
        let _ = extract(input, Some("CfgWeapons"), &ExclusionSet::default());
    }
    assert_eq!(extract(inputs[0], None, &ExclusionSet::new()), vec!["A"]);
}
