//! Project symbol index: definitions by name across many files.
//!
//! The index never owns files. It asks a [`FileEnumerator`] which files
//! belong to a [`SearchScope`] and a [`TreeProvider`] for their trees, and
//! caches each file's definitions keyed by `(FileId, version)`.
//!
//! # Refresh protocol
//!
//! Every query first refreshes the files in scope:
//!
//! 1. Files whose cached version is at least the provider's version are reused.
//! 2. All other files are re-extracted, in parallel when there are enough
//!    of them (see [`IndexConfig`]).
//! 3. Files without a tree are evicted and contribute nothing.
//!
//! An entry is never replaced by one built from an older version.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::definition::{Definition, file_definitions};
use crate::base::FileId;
use crate::syntax::Parse;

// ============================================================================
// COLLABORATORS
// ============================================================================

/// Supplies the current tree of a file.
pub trait TreeProvider: Sync {
    /// Content version of `file`; grows whenever the contents change.
    /// `None` if the file is unknown.
    fn version(&self, file: FileId) -> Option<u64>;

    /// The current parse of `file`, or `None` if it cannot be read.
    fn tree(&self, file: FileId) -> Option<Arc<Parse>>;
}

/// Lists the CMake files visible in a scope.
pub trait FileEnumerator {
    fn enumerate_files(&self, scope: &SearchScope) -> Vec<FileId>;
}

/// The set of files a query runs over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchScope {
    /// Every file of the project.
    #[default]
    All,
    /// Exactly these files.
    Files(Vec<FileId>),
    /// Files below a directory.
    Directory(PathBuf),
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Tuning knobs for [`SymbolIndex`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexConfig {
    /// Extract stale files on the rayon pool.
    pub parallel: bool,
    /// Minimum number of stale files before going parallel.
    pub parallel_threshold: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 8,
        }
    }
}

impl IndexConfig {
    /// Enable or disable parallel extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of stale files at which extraction goes parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// Counters describing cache behaviour since the index was created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Files served from the cache.
    pub cache_hits: u64,
    /// Files (re-)extracted.
    pub cache_misses: u64,
    /// Files skipped because no tree was available.
    pub skipped_files: u64,
}

/// Returned by the `*_cancellable` queries when the token fires mid-scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("definition scan was cancelled")]
pub struct ScanCancelled;

// ============================================================================
// SYMBOL INDEX
// ============================================================================

#[derive(Debug)]
struct FileEntry {
    version: u64,
    definitions: Arc<[Definition]>,
}

#[derive(Debug, Default)]
struct IndexInner {
    by_file: FxHashMap<FileId, FileEntry>,
    /// Name -> files defining it. Only holds names of cached entries.
    by_name: FxHashMap<SmolStr, FxHashSet<FileId>>,
    stats: IndexStats,
}

impl IndexInner {
    fn insert(&mut self, file: FileId, version: u64, definitions: Vec<Definition>) {
        if self
            .by_file
            .get(&file)
            .is_some_and(|entry| entry.version > version)
        {
            return;
        }
        self.remove(file);

        for def in &definitions {
            self.by_name
                .entry(def.name.clone())
                .or_default()
                .insert(file);
        }
        self.by_file.insert(
            file,
            FileEntry {
                version,
                definitions: definitions.into(),
            },
        );
    }

    fn remove(&mut self, file: FileId) {
        let Some(entry) = self.by_file.remove(&file) else {
            return;
        };
        for def in entry.definitions.iter() {
            if let Some(files) = self.by_name.get_mut(&def.name) {
                files.remove(&file);
                if files.is_empty() {
                    self.by_name.remove(&def.name);
                }
            }
        }
    }
}

/// Outcome of extracting one stale file.
enum Extracted {
    Definitions(u64, Vec<Definition>),
    Unavailable,
}

/// Lazily refreshed mapping from definition name to its occurrences.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    config: IndexConfig,
    inner: RwLock<IndexInner>,
}

impl SymbolIndex {
    /// Create an empty index with the default [`IndexConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with `config`.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            config,
            inner: RwLock::default(),
        }
    }

    /// The configuration this index was created with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Every definition of every file in `scope`.
    pub fn all_definitions<P, E>(
        &self,
        provider: &P,
        enumerator: &E,
        scope: &SearchScope,
    ) -> Vec<Definition>
    where
        P: TreeProvider + ?Sized,
        E: FileEnumerator + ?Sized,
    {
        let files = enumerator.enumerate_files(scope);
        // Without a token the scan cannot be cancelled.
        self.refresh(provider, &files, None)
            .map(|present| self.collect(&present, |_| true))
            .unwrap_or_default()
    }

    /// Definitions in `scope` whose whole name matches the regex `pattern`.
    ///
    /// Matching is case-sensitive and anchored at both ends: `fo.*` matches
    /// `foo` but not `barfoo`. An invalid pattern matches nothing.
    pub fn definitions_named<P, E>(
        &self,
        provider: &P,
        enumerator: &E,
        scope: &SearchScope,
        pattern: &str,
    ) -> Vec<Definition>
    where
        P: TreeProvider + ?Sized,
        E: FileEnumerator + ?Sized,
    {
        let files = enumerator.enumerate_files(scope);
        self.refresh(provider, &files, None)
            .map(|present| self.lookup(&present, pattern))
            .unwrap_or_default()
    }

    /// [`Self::all_definitions`], checking `token` between files. Files
    /// extracted before the token fired stay cached, so a later scan
    /// resumes with the files that were not reached.
    pub fn all_definitions_cancellable<P, E>(
        &self,
        provider: &P,
        enumerator: &E,
        scope: &SearchScope,
        token: &CancellationToken,
    ) -> Result<Vec<Definition>, ScanCancelled>
    where
        P: TreeProvider + ?Sized,
        E: FileEnumerator + ?Sized,
    {
        let files = enumerator.enumerate_files(scope);
        let present = self.refresh(provider, &files, Some(token))?;
        Ok(self.collect(&present, |_| true))
    }

    /// [`Self::definitions_named`], checking `token` between files.
    pub fn definitions_named_cancellable<P, E>(
        &self,
        provider: &P,
        enumerator: &E,
        scope: &SearchScope,
        pattern: &str,
        token: &CancellationToken,
    ) -> Result<Vec<Definition>, ScanCancelled>
    where
        P: TreeProvider + ?Sized,
        E: FileEnumerator + ?Sized,
    {
        let files = enumerator.enumerate_files(scope);
        let present = self.refresh(provider, &files, Some(token))?;
        Ok(self.lookup(&present, pattern))
    }

    /// Definitions of a single file, in source order.
    pub fn definitions_in_file<P>(&self, provider: &P, file: FileId) -> Vec<Definition>
    where
        P: TreeProvider + ?Sized,
    {
        self.refresh(provider, &[file], None)
            .map(|present| self.collect(&present, |_| true))
            .unwrap_or_default()
    }

    /// Drop the cached entry of `file`.
    pub fn remove_file(&self, file: FileId) {
        self.inner.write().remove(file);
    }

    /// Drop every cached entry. Statistics are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.by_file.clear();
        inner.by_name.clear();
    }

    /// Number of files with a cached entry.
    pub fn file_count(&self) -> usize {
        self.inner.read().by_file.len()
    }

    /// A snapshot of the cache counters.
    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats.clone()
    }

    fn lookup(&self, files: &[FileId], pattern: &str) -> Vec<Definition> {
        if regex::escape(pattern) == pattern {
            return self.lookup_literal(files, pattern);
        }

        // Validate the pattern on its own first: an unbalanced `)` would
        // otherwise close the anchoring group early.
        let anchored = Regex::new(pattern).and_then(|_| Regex::new(&format!("^(?:{pattern})$")));
        match anchored {
            Ok(regex) => self.collect(files, |def| regex.is_match(def.name())),
            Err(err) => {
                tracing::warn!(pattern, error = %err, "invalid definition name pattern");
                Vec::new()
            }
        }
    }

    /// Exact-name lookup through the inverted index.
    fn lookup_literal(&self, files: &[FileId], name: &str) -> Vec<Definition> {
        let inner = self.inner.read();
        let Some(defining) = inner.by_name.get(name) else {
            return Vec::new();
        };

        files
            .iter()
            .filter(|file| defining.contains(*file))
            .filter_map(|file| inner.by_file.get(file))
            .flat_map(|entry| entry.definitions.iter())
            .filter(|def| def.name() == name)
            .cloned()
            .collect()
    }

    fn collect(&self, files: &[FileId], filter: impl Fn(&Definition) -> bool) -> Vec<Definition> {
        let inner = self.inner.read();
        files
            .iter()
            .filter_map(|file| inner.by_file.get(file))
            .flat_map(|entry| entry.definitions.iter())
            .filter(|def| filter(*def))
            .cloned()
            .collect()
    }

    /// Bring the entries of `files` up to date. Returns the files that have
    /// an entry afterwards, in the order given.
    #[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
    fn refresh<P>(
        &self,
        provider: &P,
        files: &[FileId],
        token: Option<&CancellationToken>,
    ) -> Result<Vec<FileId>, ScanCancelled>
    where
        P: TreeProvider + ?Sized,
    {
        let mut seen = FxHashSet::default();
        let files: Vec<FileId> = files.iter().copied().filter(|f| seen.insert(*f)).collect();

        let mut stale = Vec::new();
        let mut unknown = Vec::new();
        {
            let inner = self.inner.read();
            for &file in &files {
                match provider.version(file) {
                    None => unknown.push(file),
                    Some(version) => {
                        let fresh = inner
                            .by_file
                            .get(&file)
                            .is_some_and(|entry| entry.version >= version);
                        if !fresh {
                            stale.push((file, version));
                        }
                    }
                }
            }
        }
        let hits = (files.len() - stale.len() - unknown.len()) as u64;

        let extract = |&(file, version): &(FileId, u64)| {
            if token.is_some_and(|t| t.is_cancelled()) {
                return Err(ScanCancelled);
            }
            let extracted = match provider.tree(file) {
                Some(parse) => {
                    Extracted::Definitions(version, file_definitions(file, &parse.syntax_node()))
                }
                None => Extracted::Unavailable,
            };
            Ok((file, extracted))
        };

        let parallel = self.config.parallel && stale.len() >= self.config.parallel_threshold;
        // Every stale file gets a result, so work finished before a
        // cancellation is still cached.
        let results: Vec<Result<_, ScanCancelled>> = if parallel {
            stale.par_iter().map(extract).collect()
        } else {
            stale.iter().map(extract).collect()
        };

        let mut inner = self.inner.write();
        inner.stats.cache_hits += hits;
        for file in unknown {
            inner.remove(file);
            inner.stats.skipped_files += 1;
        }

        let mut cancelled = false;
        for result in results {
            let Ok((file, extracted)) = result else {
                cancelled = true;
                continue;
            };
            inner.stats.cache_misses += 1;
            match extracted {
                Extracted::Definitions(version, definitions) => {
                    inner.insert(file, version, definitions);
                }
                Extracted::Unavailable => {
                    tracing::debug!(%file, "no tree available, skipping");
                    inner.remove(file);
                    inner.stats.skipped_files += 1;
                }
            }
        }

        if cancelled {
            tracing::debug!(cached = inner.by_file.len(), "definition scan cancelled");
            return Err(ScanCancelled);
        }
        tracing::debug!(hits, stale = stale.len(), parallel, "refreshed definition index");

        Ok(files
            .iter()
            .copied()
            .filter(|file| inner.by_file.contains_key(file))
            .collect())
    }
}
