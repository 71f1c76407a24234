//! Renaming definitions and writing the result back to the host.

use cmake_outline::hir::{InvalidNameReason, RenameError, SearchScope, get_name, set_name};
use cmake_outline::ide::AnalysisHost;
use cmake_outline::syntax::SyntaxKind;

fn host_with(text: &str) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    host.set_file_content("/proj/CMakeLists.txt", text);
    host
}

#[test]
fn test_rename_roundtrip() {
    let mut host = host_with("function(foo a b)\n  message(${a})\nendfunction()\nfoo(1 2)\n");
    let def = host.analysis().definitions_named(&SearchScope::All, "foo").remove(0);
    assert_eq!(get_name(&def), "foo");

    let renamed = host.apply_rename(&def, "baz").unwrap();
    assert_eq!(get_name(&renamed), "baz");
    assert_eq!(renamed.anchor().unwrap().kind(), SyntaxKind::FILE_ELEMENT);

    let file = host.file_id("/proj/CMakeLists.txt").unwrap();
    assert_eq!(
        host.files().contents(file).as_deref(),
        Some("function(baz a b)\n  message(${a})\nendfunction()\nfoo(1 2)\n")
    );
}

#[test]
fn test_rename_quoted_definition() {
    let mut host = host_with("function(\"foo\")\nendfunction()\n");
    let def = host.analysis().all_definitions(&SearchScope::All).remove(0);
    assert_eq!(get_name(&def), "\"foo\"");

    let renamed = host.apply_rename(&def, "baz").unwrap();
    assert_eq!(get_name(&renamed), "baz");
    assert_eq!(host.analysis().definitions_named(&SearchScope::All, "baz").len(), 1);
}

#[test]
fn test_rename_after_edit_is_refused() {
    let mut host = host_with("function(foo)\nendfunction()\n");
    let def = host.analysis().all_definitions(&SearchScope::All).remove(0);
    host.set_file_content("/proj/CMakeLists.txt", "function(foo)\nendfunction()\nmacro(m)\nendmacro()\n");

    assert!(matches!(host.apply_rename(&def, "baz"), Err(RenameError::Stale(_))));
    assert_eq!(host.analysis().all_definitions(&SearchScope::All).len(), 2);
}

#[test]
fn test_rejected_names_leave_file_alone() {
    let text = "macro(keep)\nendmacro()\n";
    let mut host = host_with(text);
    let def = host.analysis().all_definitions(&SearchScope::All).remove(0);

    for (name, reason) in [
        ("", InvalidNameReason::Empty),
        ("bad name", InvalidNameReason::Whitespace),
    ] {
        match host.apply_rename(&def, name) {
            Err(RenameError::InvalidName(err)) => assert_eq!(err.reason, reason),
            other => panic!("expected invalid name for {name:?}, got {other:?}"),
        }
    }

    let file = host.file_id("/proj/CMakeLists.txt").unwrap();
    assert_eq!(host.files().contents(file).as_deref(), Some(text));
    assert_eq!(host.analysis().definitions_named(&SearchScope::All, "keep").len(), 1);
}

#[test]
fn test_set_name_does_not_touch_host() {
    let host = host_with("function(foo)\nendfunction()\n");
    let def = host.analysis().all_definitions(&SearchScope::All).remove(0);

    let renamed = set_name(&def, "bar").unwrap();
    assert_eq!(renamed.name(), "bar");
    assert_eq!(host.analysis().definitions_named(&SearchScope::All, "foo").len(), 1);
    assert!(host.analysis().definitions_named(&SearchScope::All, "bar").is_empty());
}
