//! Integration tests for YAML front matter.

use sternmark::{parse, ErrorKind};

#[test]
fn mapping_front_matter_with_body() {
    let doc = parse("fm.md", "---\nkey: 1\n---\n# h").unwrap();
    let yaml = doc.yaml().unwrap();
    assert_eq!(yaml["key"], serde_yaml::Value::from(1));
    assert_eq!(doc.render().as_str(), "<h1 id=\"h\">h</h1>\n");
}

#[test]
fn documents_without_front_matter_have_no_yaml() {
    let doc = parse("fm.md", "# h").unwrap();
    assert!(doc.yaml().is_none());
}

#[test]
fn nested_values_survive_decoding() {
    let doc = parse(
        "fm.md",
        "---\ntitle: Post\ntags:\n  - a\n  - b\n---\n\nbody",
    )
    .unwrap();
    let yaml = doc.yaml().unwrap();
    assert_eq!(yaml["title"], serde_yaml::Value::from("Post"));
    assert_eq!(yaml["tags"][1], serde_yaml::Value::from("b"));
}

#[test]
fn decoder_errors_fail_the_parse_but_not_the_block_phase() {
    let err = parse("fm.md", "---\nkey: [broken\n---\n\nstill parsed").unwrap_err();
    assert_eq!(err.len(), 1);
    assert!(matches!(err.errors().first().kind, ErrorKind::YamlParse(_)));
    // The decoder's own offset lands inside the front-matter body.
    assert!(err.errors().first().offset >= 4);
    assert!(err.to_string().starts_with("fm.md:"));
}

#[test]
fn fence_pair_must_close() {
    let doc = parse("fm.md", "---\nkey: 1").unwrap();
    assert!(doc.yaml().is_none());
    // The orphan fence reads as a thematic break.
    assert!(doc.render().as_str().starts_with("<hr/>\n"));
}

#[test]
fn front_matter_only_at_the_top() {
    let doc = parse("fm.md", "text\n\n---\nkey: 1\n---").unwrap();
    assert!(doc.yaml().is_none());
}
