//! The in-memory set of CMake source files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::index::{FileEnumerator, SearchScope, TreeProvider};
use crate::base::FileId;
use crate::syntax::{self, Parse};

/// True for `CMakeLists.txt` and `*.cmake` paths.
/// True for `CMakeLists.txt` and `*.cmake` files, ignoring ASCII case.
pub fn is_cmake_path(path: &Path) -> bool {
    let is_lists = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case("CMakeLists.txt"));
    let is_module = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("cmake"));
    is_lists || is_module
}

/// Assigns stable [`FileId`]s to paths and tracks their contents.
///
/// Every content change gets a new version from a counter shared by all
/// files, so versions only ever grow. Parses are computed lazily and
/// cached per version.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    path_to_id: IndexMap<PathBuf, FileId>,
    files: IndexMap<FileId, FileData>,
    next_id: u32,
    last_version: u64,
}

#[derive(Debug)]
struct FileData {
    path: PathBuf,
    /// `None` while the file is registered but unreadable.
    contents: Option<Arc<str>>,
    version: u64,
    parse: Option<Arc<Parse>>,
}

impl FileSet {
    /// Create an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the id for `path`.
    pub fn file_id(&self, path: &Path) -> FileId {
        if let Some(&id) = self.inner.read().path_to_id.get(path) {
            return id;
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.files.insert(
            id,
            FileData {
                path: path.to_owned(),
                contents: None,
                version: 0,
                parse: None,
            },
        );
        id
    }

    /// Look up the id of an already registered path.
    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.inner.read().path_to_id.get(path).copied()
    }

    /// The path `file` was registered under.
    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().files.get(&file).map(|d| d.path.clone())
    }

    /// The last path component, used as the outline root label.
    pub fn display_name(&self, file: FileId) -> Option<String> {
        let inner = self.inner.read();
        let path = &inner.files.get(&file)?.path;
        Some(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        )
    }

    /// Replace the contents of `file`, returning the new version.
    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) -> Option<u64> {
        self.update(file, Some(contents.into()))
    }

    /// Mark `file` unreadable. It stays registered but has no tree.
    pub fn clear_contents(&self, file: FileId) -> Option<u64> {
        self.update(file, None)
    }

    fn update(&self, file: FileId, contents: Option<Arc<str>>) -> Option<u64> {
        let mut inner = self.inner.write();
        inner.last_version += 1;
        let version = inner.last_version;

        let data = inner.files.get_mut(&file)?;
        data.contents = contents;
        data.version = version;
        data.parse = None;
        Some(version)
    }

    /// Current contents, `None` if unknown or unreadable.
    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().files.get(&file)?.contents.clone()
    }

    /// Current content version, `None` for unknown files.
    pub fn version(&self, file: FileId) -> Option<u64> {
        self.inner.read().files.get(&file).map(|d| d.version)
    }

    /// Parse of the current contents, `None` if the file is unknown or unreadable.
    pub fn parse(&self, file: FileId) -> Option<Arc<Parse>> {
        let (contents, version) = {
            let inner = self.inner.read();
            let data = inner.files.get(&file)?;
            if let Some(parse) = &data.parse {
                return Some(parse.clone());
            }
            (data.contents.clone()?, data.version)
        };

        let parsed = Arc::new(syntax::parse(&contents));

        let mut inner = self.inner.write();
        if let Some(data) = inner.files.get_mut(&file) {
            // Contents may have changed while parsing; only cache a current parse.
            if data.version == version {
                data.parse = Some(parsed.clone());
            }
        }
        Some(parsed)
    }

    /// Forget `file`. Its id is not reused.
    pub fn remove(&self, file: FileId) {
        let mut inner = self.inner.write();
        if let Some(data) = inner.files.shift_remove(&file) {
            inner.path_to_id.shift_remove(&data.path);
        }
    }

    /// Number of registered files, readable or not.
    pub fn len(&self) -> usize {
        self.inner.read().files.len()
    }

    /// True if no file is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered files, in registration order.
    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().files.keys().copied().collect()
    }
}

impl TreeProvider for FileSet {
    fn version(&self, file: FileId) -> Option<u64> {
        FileSet::version(self, file)
    }

    fn tree(&self, file: FileId) -> Option<Arc<Parse>> {
        self.parse(file)
    }
}

impl FileEnumerator for FileSet {
    fn enumerate_files(&self, scope: &SearchScope) -> Vec<FileId> {
        let inner = self.inner.read();
        let in_scope = |data: &FileData| match scope {
            SearchScope::All => true,
            SearchScope::Directory(dir) => data.path.starts_with(dir),
            SearchScope::Files(_) => true,
        };

        let candidates: Vec<FileId> = match scope {
            SearchScope::Files(files) => files
                .iter()
                .copied()
                .filter(|f| inner.files.contains_key(f))
                .collect(),
            _ => inner.files.keys().copied().collect(),
        };

        candidates
            .into_iter()
            .filter(|f| {
                inner
                    .files
                    .get(f)
                    .is_some_and(|data| in_scope(data) && is_cmake_path(&data.path))
            })
            .collect()
    }
}
