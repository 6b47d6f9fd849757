//! End-to-end rendering scenarios.

use rstest::rstest;
use sternmark::parse;

#[rstest]
#[case("# Hi", "<h1 id=\"hi\">Hi</h1>\n")]
#[case("a *b* c", "<p>a <em>b</em> c</p>\n")]
#[case(
    "[x][y]\n\n[y]: /u \"t\"",
    "<p><a href=\"/u\" title=\"t\">x</a></p>\n"
)]
#[case("1. a\n2. b", "<ol>\n<li>a</li>\n<li>b</li>\n</ol>\n")]
#[case("`a  b`", "<p><code>a b</code></p>\n")]
fn concrete_scenarios(#[case] input: &str, #[case] expected: &str) {
    let doc = parse("scenario.md", input).unwrap();
    assert_eq!(doc.render().as_str(), expected);
}

#[test]
fn front_matter_scenario() {
    let doc = parse("scenario.md", "---\nkey: 1\n---\n# h").unwrap();
    assert_eq!(doc.yaml().unwrap()["key"], serde_yaml::Value::from(1));
    assert_eq!(doc.render().as_str(), "<h1 id=\"h\">h</h1>\n");
}

#[test]
fn rendering_is_deterministic() {
    let source = "# T\n\n- a\n- b\n\n> q *em*\n\n```x\ncode\n```\n";
    let first = parse("d.md", source).unwrap().render();
    let second = parse("d.md", source).unwrap().render();
    assert_eq!(first, second);
}

#[test]
fn fragment_has_no_document_wrapper() {
    let html = parse("d.md", "text").unwrap().render();
    assert!(!html.as_str().contains("<html>"));
    assert!(!html.as_str().contains("<body>"));
}

#[test]
fn blocks_emit_trailing_newlines() {
    let html = parse("d.md", "a\n\n***\n\nb").unwrap().render();
    assert_eq!(html.as_str(), "<p>a</p>\n<hr/>\n<p>b</p>\n");
}

#[test]
fn plain_text_is_escaped() {
    let html = parse("d.md", "5 < 6 & \"q\"").unwrap().render();
    assert_eq!(html.as_str(), "<p>5 &lt; 6 &amp; &quot;q&quot;</p>\n");
}

#[test]
fn heading_ids_survive_markup() {
    let html = parse("d.md", "## A *B* C").unwrap().render();
    assert_eq!(
        html.as_str(),
        "<h2 id=\"a-b-c\">A <em>B</em> C</h2>\n"
    );
}

#[test]
fn empty_document_renders_empty() {
    let html = parse("d.md", "").unwrap().render();
    assert!(html.is_empty());
}

#[test]
fn mixed_document() {
    let source = "# Title\n\nIntro *text*.\n\n- one\n- two\n\n> quote\n";
    let html = parse("d.md", source).unwrap().render();
    assert_eq!(
        html.as_str(),
        "<h1 id=\"title\">Title</h1>\n\
         <p>Intro <em>text</em>.</p>\n\
         <ul>\n<li>one</li>\n<li>two</li>\n</ul>\n\
         <blockquote>\n<p>quote</p>\n</blockquote>\n"
    );
}
