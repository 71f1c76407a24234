//! Project loading: discovering CMake files on disk and feeding them to a
//! host.

mod file_loader;
mod workspace_loader;

pub use file_loader::{LoadError, LoadOptions, collect_file_paths, load_file};
pub use workspace_loader::{LoadReport, WorkspaceLoader};
