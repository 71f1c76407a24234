//! The analysis host: owns the file set and the symbol index.
//!
//! Mutations go through [`AnalysisHost`]; queries go through the
//! [`Analysis`] snapshot it hands out.

use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::outline::{OutlineNode, build_outline};
use super::symbols;
use crate::base::{FileId, TextSize};
use crate::hir::{
    Definition, FileSet, IndexConfig, RenameError, ScanCancelled, SearchScope, SymbolIndex,
    set_name,
};
use crate::syntax::Parse;

#[derive(Debug, Default)]
pub struct AnalysisHost {
    files: FileSet,
    index: SymbolIndex,
}

impl AnalysisHost {
    /// Create a host with no files and a default index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose index uses `config`.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            files: FileSet::new(),
            index: SymbolIndex::with_config(config),
        }
    }

    /// Register `path` (if new) and set its contents.
    pub fn set_file_content(&mut self, path: impl AsRef<Path>, text: impl Into<Arc<str>>) -> FileId {
        let file = self.files.file_id(path.as_ref());
        self.files.set_contents(file, text);
        file
    }

    /// Register `path` as present but unreadable; it has no tree.
    pub fn set_file_unreadable(&mut self, path: impl AsRef<Path>) -> FileId {
        let file = self.files.file_id(path.as_ref());
        self.files.clear_contents(file);
        file
    }

    /// Forget `path` and its cached definitions.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> Option<FileId> {
        let file = self.files.lookup(path.as_ref())?;
        self.files.remove(file);
        self.index.remove_file(file);
        Some(file)
    }

    /// The id of `path`, if registered.
    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.files.lookup(path.as_ref())
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    /// Rename `def` and store the renamed text as the file's new contents.
    ///
    /// Fails with [`RenameError::Stale`] if the file changed since `def` was
    /// taken from it, so edits made in between are never overwritten.
    pub fn apply_rename(&mut self, def: &Definition, new_name: &str) -> Result<Definition, RenameError> {
        let current = self
            .files
            .parse(def.file())
            .is_some_and(|parse| parse.green() == def.green());
        if !current {
            return Err(RenameError::Stale(SmolStr::new(def.name())));
        }

        let renamed = set_name(def, new_name)?;
        self.files
            .set_contents(def.file(), renamed.root().text().to_string());
        Ok(renamed)
    }

    /// A read-only snapshot for running queries.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            files: &self.files,
            index: &self.index,
        }
    }
}

/// Read-only view used to answer queries.
#[derive(Clone, Copy, Debug)]
pub struct Analysis<'a> {
    files: &'a FileSet,
    index: &'a SymbolIndex,
}

impl<'a> Analysis<'a> {
    pub fn parse(&self, file: FileId) -> Option<Arc<Parse>> {
        self.files.parse(file)
    }

    /// Outline of `file`, or `None` if the file has no tree.
    pub fn outline(&self, file: FileId) -> Option<OutlineNode> {
        let parse = self.files.parse(file)?;
        let name = self.files.display_name(file)?;
        Some(build_outline(file, &name, &parse.syntax_node()))
    }

    /// Every definition in `scope`.
    pub fn all_definitions(&self, scope: &SearchScope) -> Vec<Definition> {
        self.index.all_definitions(self.files, self.files, scope)
    }

    /// Definitions in `scope` whose whole name matches the regex `pattern`.
    pub fn definitions_named(&self, scope: &SearchScope, pattern: &str) -> Vec<Definition> {
        symbols::workspace_symbols(self.index, self.files, scope, pattern)
    }

    pub fn all_definitions_cancellable(
        &self,
        scope: &SearchScope,
        token: &CancellationToken,
    ) -> Result<Vec<Definition>, ScanCancelled> {
        self.index
            .all_definitions_cancellable(self.files, self.files, scope, token)
    }

    pub fn definitions_named_cancellable(
        &self,
        scope: &SearchScope,
        pattern: &str,
        token: &CancellationToken,
    ) -> Result<Vec<Definition>, ScanCancelled> {
        self.index
            .definitions_named_cancellable(self.files, self.files, scope, pattern, token)
    }

    pub fn definitions_in_file(&self, file: FileId) -> Vec<Definition> {
        self.index.definitions_in_file(self.files, file)
    }

    /// Definitions named like the word at `offset`.
    pub fn goto_definition(&self, file: FileId, offset: TextSize) -> Vec<Definition> {
        symbols::goto_definition(self.index, self.files, file, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_outline_and_queries() {
        let mut host = AnalysisHost::new();
        let file = host.set_file_content("/p/CMakeLists.txt", "function(foo)\nendfunction()\n");

        let analysis = host.analysis();
        let outline = analysis.outline(file).unwrap();
        assert_eq!(outline.label, "CMakeLists.txt");
        assert_eq!(outline.children.len(), 1);
        assert_eq!(analysis.definitions_named(&SearchScope::All, "foo").len(), 1);
    }

    #[test]
    fn test_host_edit_is_visible_to_next_query() {
        let mut host = AnalysisHost::new();
        host.set_file_content("/p/a.cmake", "function(before)\nendfunction()");
        assert_eq!(host.analysis().all_definitions(&SearchScope::All).len(), 1);

        host.set_file_content("/p/a.cmake", "function(after)\nendfunction()");
        let defs = host.analysis().all_definitions(&SearchScope::All);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name(), "after");
    }

    #[test]
    fn test_host_remove_file() {
        let mut host = AnalysisHost::new();
        host.set_file_content("/p/a.cmake", "macro(m)\nendmacro()");
        host.analysis().all_definitions(&SearchScope::All);

        assert!(host.remove_file("/p/a.cmake").is_some());
        assert!(host.analysis().all_definitions(&SearchScope::All).is_empty());
        assert!(host.remove_file("/p/a.cmake").is_none());
    }

    #[test]
    fn test_apply_rename_updates_index() {
        let mut host = AnalysisHost::new();
        host.set_file_content("/p/a.cmake", "function(foo)\nendfunction()\nfoo()\n");
        let def = host.analysis().definitions_named(&SearchScope::All, "foo").remove(0);

        let renamed = host.apply_rename(&def, "baz").unwrap();
        assert_eq!(renamed.name(), "baz");

        let analysis = host.analysis();
        assert!(analysis.definitions_named(&SearchScope::All, "foo").is_empty());
        assert_eq!(analysis.definitions_named(&SearchScope::All, "baz").len(), 1);
    }

    #[test]
    fn test_apply_rename_refuses_outdated_definition() {
        let mut host = AnalysisHost::new();
        let file = host.set_file_content("/p/a.cmake", "function(foo)\nendfunction()\n");
        let def = host.analysis().definitions_named(&SearchScope::All, "foo").remove(0);

        let edited = "function(foo)\nendfunction()\nfunction(added_later)\nendfunction()\n";
        host.set_file_content("/p/a.cmake", edited);

        let err = host.apply_rename(&def, "baz").unwrap_err();
        assert_eq!(err, RenameError::Stale("foo".into()));
        assert_eq!(host.files().contents(file).as_deref(), Some(edited));

        // Rewriting identical text keeps earlier definitions usable.
        host.set_file_content("/p/a.cmake", edited);
        let def = host.analysis().definitions_named(&SearchScope::All, "foo").remove(0);
        host.set_file_content("/p/a.cmake", edited);
        assert!(host.apply_rename(&def, "baz").is_ok());
    }

    #[test]
    fn test_unreadable_file_has_no_outline() {
        let mut host = AnalysisHost::new();
        let file = host.set_file_unreadable("/p/broken.cmake");
        assert!(host.analysis().outline(file).is_none());
        assert!(host.analysis().all_definitions(&SearchScope::All).is_empty());
    }
}
