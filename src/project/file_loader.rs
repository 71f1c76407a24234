use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::hir::is_cmake_path;

/// Options for discovering and reading files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Follow symbolic links while walking directories.
    pub follow_links: bool,
    /// Files larger than this are reported as errors and left unread.
    pub max_file_size_bytes: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_file_size_bytes: 8 * 1024 * 1024,
        }
    }
}

impl LoadOptions {
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size_bytes = bytes;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: file is {size} bytes, limit is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("{}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl LoadError {
    /// The path the error is about.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotADirectory(path)
            | LoadError::Io { path, .. }
            | LoadError::TooLarge { path, .. }
            | LoadError::Walk { path, .. } => path,
        }
    }
}

/// All CMake files under `dir`, sorted by path.
///
/// Entries that cannot be visited are returned as errors alongside the
/// paths that could.
pub fn collect_file_paths(
    dir: &Path,
    options: &LoadOptions,
) -> Result<(Vec<PathBuf>, Vec<LoadError>), LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(dir).follow_links(options.follow_links) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_cmake_path(entry.path()) => {
                paths.push(entry.into_path());
            }
            Ok(_) => {}
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                errors.push(LoadError::Walk { path, source: err });
            }
        }
    }
    paths.sort();
    Ok((paths, errors))
}

/// Read one file, honoring the size limit.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<String, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > options.max_file_size_bytes {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: options.max_file_size_bytes,
        });
    }
    std::fs::read_to_string(path).map_err(io_err)
}
