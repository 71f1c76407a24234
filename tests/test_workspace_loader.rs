//! Loading a project tree from disk.

use std::fs;

use cmake_outline::hir::SearchScope;
use cmake_outline::ide::AnalysisHost;
use cmake_outline::project::{LoadError, LoadOptions, WorkspaceLoader};
use tempfile::TempDir;

fn write_project(dir: &TempDir) {
    let root = dir.path();
    fs::create_dir_all(root.join("cmake")).unwrap();
    fs::create_dir_all(root.join("src/lib")).unwrap();
    fs::write(
        root.join("CMakeLists.txt"),
        "project(demo)\ninclude(cmake/Helpers.cmake)\nadd_subdirectory(src/lib)\n",
    )
    .unwrap();
    fs::write(
        root.join("cmake/Helpers.cmake"),
        "function(demo_add_library name)\nendfunction()\nmacro(demo_warn msg)\nendmacro()\n",
    )
    .unwrap();
    fs::write(root.join("src/lib/CMakeLists.txt"), "demo_add_library(core)\n").unwrap();
    fs::write(root.join("src/lib/core.cpp"), "void core() {}\n").unwrap();
}

#[test]
fn test_load_project_tree() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    let mut host = AnalysisHost::new();
    let report = WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &mut host)
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.loaded.len(), 3);
    assert!(host.file_id(dir.path().join("src/lib/core.cpp")).is_none());

    let analysis = host.analysis();
    assert_eq!(analysis.all_definitions(&SearchScope::All).len(), 2);

    let helpers = host.file_id(dir.path().join("cmake/Helpers.cmake")).unwrap();
    let outline = analysis.outline(helpers).unwrap();
    assert_eq!(outline.label, "Helpers.cmake");
    assert_eq!(outline.children.len(), 2);
}

#[test]
fn test_directory_scope_after_load() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    let mut host = AnalysisHost::new();
    WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &mut host)
        .unwrap();

    let analysis = host.analysis();
    let cmake_dir = SearchScope::Directory(dir.path().join("cmake"));
    assert_eq!(analysis.definitions_named(&cmake_dir, "demo_.*").len(), 2);

    let src_dir = SearchScope::Directory(dir.path().join("src"));
    assert!(analysis.definitions_named(&src_dir, "demo_.*").is_empty());
}

#[test]
fn test_reload_picks_up_changes() {
    let dir = TempDir::new().unwrap();
    write_project(&dir);

    let loader = WorkspaceLoader::new();
    let mut host = AnalysisHost::new();
    loader.load_directory_into_host(dir.path(), &mut host).unwrap();
    assert_eq!(host.analysis().all_definitions(&SearchScope::All).len(), 2);

    fs::write(dir.path().join("cmake/Helpers.cmake"), "macro(only)\nendmacro()\n").unwrap();
    loader.load_directory_into_host(dir.path(), &mut host).unwrap();

    let names: Vec<_> = host
        .analysis()
        .all_definitions(&SearchScope::All)
        .iter()
        .map(|d| d.name().to_owned())
        .collect();
    assert_eq!(names, vec!["only"]);
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let mut host = AnalysisHost::new();
    let err = WorkspaceLoader::with_options(LoadOptions::default().with_follow_links(true))
        .load_directory_into_host(dir.path().join("absent"), &mut host)
        .unwrap_err();
    assert!(matches!(err, LoadError::NotADirectory(_)));
    assert!(host.files().is_empty());
}
