//! Integration tests for error collection and reporting.

use sternmark::{parse, ErrorKind};

#[test]
fn all_errors_in_a_document_are_collected() {
    let source = "####### deep\n\nfoo* bar\n\n&nope;\n";
    let err = parse("multi.md", source).unwrap_err();
    assert_eq!(err.len(), 3);
    let kinds: Vec<_> = err.errors().iter().map(|e| &e.kind).collect();
    assert!(matches!(kinds[0], ErrorKind::Unexpected { .. }));
    assert!(matches!(kinds[1], ErrorKind::NonFlankingDelimiterRun(_)));
    assert!(matches!(kinds[2], ErrorKind::UnknownHtmlEntityName(_)));
}

#[test]
fn errors_sort_by_offset() {
    let err = parse("sort.md", "x &bad; y\n\nfoo* bar\n").unwrap_err();
    let offsets: Vec<_> = err.errors().iter().map(|e| e.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
}

#[test]
fn display_is_one_indexed_and_file_prefixed() {
    let err = parse("pos.md", "ok line\nfoo* bar\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "pos.md:2:4: non-flanking delimiter run: *"
    );
}

#[test]
fn columns_count_tabs_as_four() {
    let err = parse("tab.md", "a\tfoo* bar\n").unwrap_err();
    // a(1) + tab(4) + foo(3) puts the delimiter at column 9.
    assert_eq!(err.to_string(), "tab.md:1:9: non-flanking delimiter run: *");
}

#[test]
fn recovered_blocks_keep_parsing() {
    // The broken heading recovers and the rest still parses (and errors
    // found later are still reported).
    let err = parse("rec.md", "####### bad\n\n&oops;\n").unwrap_err();
    assert_eq!(err.len(), 2);
}

#[test]
fn successful_documents_have_no_bundle() {
    assert!(parse("ok.md", "# fine\n\ntext *em* `code`\n").is_ok());
}

#[test]
fn error_offsets_point_into_the_source() {
    let source = "alpha\n\nbeta &x; gamma\n";
    let err = parse("off.md", source).unwrap_err();
    let offset = err.errors().first().offset;
    assert_eq!(&source[offset..offset + 1], "&");
}
