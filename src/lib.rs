//! # cmake-outline
//!
//! Outline extraction and a project-wide index of `function`/`macro`
//! definitions for CMake scripts.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → Workspace loading from disk
//!   ↓
//! ide     → Outline, symbol search, goto-definition, analysis host
//!   ↓
//! hir     → Definition matching, symbol index, rename
//!   ↓
//! syntax  → Lexer, parser and typed wrappers over rowan trees
//!   ↓
//! base    → Primitives (FileId, TextRange, LineIndex)
//! ```

/// Foundation types: FileId, text ranges, line/column conversion
pub mod base;

/// Semantic model: definitions and the project index
pub mod hir;

/// Editor-facing queries: outline, symbols, goto-definition
pub mod ide;

pub mod project;
pub mod syntax;

pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use hir::{Definition, DefinitionKind, SearchScope, SymbolIndex};
pub use ide::{Analysis, AnalysisHost, OutlineKind, OutlineNode};
