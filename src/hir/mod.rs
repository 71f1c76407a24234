//! Semantic layer: definitions and the project-wide index over them.
//!
//! ## Layers
//!
//! - [`definition`] - matches `function`/`macro` blocks in one file's tree
//! - [`index`] - caches those matches per file and answers name queries
//! - [`rename`] - validated, copy-on-write renaming of a definition
//! - [`source`] - in-memory file set implementing the index collaborators

pub mod definition;
pub mod index;
pub mod rename;
pub mod source;

pub use definition::{Definition, DefinitionKind, file_definitions, match_definition};
pub use index::{
    FileEnumerator, IndexConfig, IndexStats, ScanCancelled, SearchScope, SymbolIndex, TreeProvider,
};
pub use rename::{
    InvalidNameError, InvalidNameReason, RenameError, get_name, name_token, set_name,
    validate_name,
};
pub use source::{FileSet, is_cmake_path};
