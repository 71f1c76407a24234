//! Workspace symbol search and go-to-definition.

use crate::base::{FileId, TextSize};
use crate::hir::{Definition, FileSet, SearchScope, SymbolIndex};
use crate::syntax::{SyntaxKind, SyntaxToken};

/// Definitions in `scope` whose name matches the regex `query` exactly.
pub fn workspace_symbols(
    index: &SymbolIndex,
    files: &FileSet,
    scope: &SearchScope,
    query: &str,
) -> Vec<Definition> {
    index.definitions_named(files, files, scope, query)
}

/// Definitions of the command or name under `offset` in `file`.
///
/// On a command name (`my_helper(...)`) the lookup ignores ASCII case, as
/// CMake does when calling commands. On an argument it is exact.
pub fn goto_definition(
    index: &SymbolIndex,
    files: &FileSet,
    file: FileId,
    offset: TextSize,
) -> Vec<Definition> {
    let Some(token) = word_at(files, file, offset) else {
        return Vec::new();
    };

    let escaped = regex::escape(token.text());
    let pattern = match token.kind() {
        SyntaxKind::IDENT => format!("(?i:{escaped})"),
        _ => escaped,
    };
    tracing::trace!(word = token.text(), %file, "goto definition");
    index.definitions_named(files, files, &SearchScope::All, &pattern)
}

fn word_at(files: &FileSet, file: FileId, offset: TextSize) -> Option<SyntaxToken> {
    let root = files.parse(file)?.syntax_node();
    if offset > root.text_range().end() {
        return None;
    }
    let is_word = |t: &SyntaxToken| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::UNQUOTED_ARG);
    root.token_at_offset(offset).find(is_word)
}
