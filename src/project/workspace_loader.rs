use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::file_loader::{self, LoadError, LoadOptions};
use crate::base::FileId;
use crate::ide::AnalysisHost;

/// Outcome of loading a directory: what made it in and what did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<FileId>,
    /// Files that exist but could not be read are still registered with
    /// the host, as unreadable.
    pub errors: Vec<LoadError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads CMake files from disk into an [`AnalysisHost`].
#[derive(Clone, Debug, Default)]
pub struct WorkspaceLoader {
    options: LoadOptions,
}

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load every CMake file under `path`, reading them in parallel.
    #[tracing::instrument(skip_all, fields(dir = %path.as_ref().display()))]
    pub fn load_directory_into_host(
        &self,
        path: impl AsRef<Path>,
        host: &mut AnalysisHost,
    ) -> Result<LoadReport, LoadError> {
        let (paths, walk_errors) = file_loader::collect_file_paths(path.as_ref(), &self.options)?;

        let results: Vec<(PathBuf, Result<String, LoadError>)> = paths
            .into_par_iter()
            .map(|path| {
                let result = file_loader::load_file(&path, &self.options);
                (path, result)
            })
            .collect();

        let mut report = LoadReport {
            loaded: Vec::with_capacity(results.len()),
            errors: walk_errors,
        };
        for (path, result) in results {
            match result {
                Ok(text) => report.loaded.push(host.set_file_content(&path, text)),
                Err(err) => {
                    tracing::warn!(error = %err, "could not load file");
                    host.set_file_unreadable(&path);
                    report.errors.push(err);
                }
            }
        }

        tracing::debug!(
            loaded = report.loaded.len(),
            failed = report.errors.len(),
            "loaded workspace"
        );
        Ok(report)
    }

    /// Load a single file. An existing file that cannot be read is
    /// registered as unreadable and the error is returned.
    pub fn load_file_into_host(
        &self,
        path: impl AsRef<Path>,
        host: &mut AnalysisHost,
    ) -> Result<FileId, LoadError> {
        let path = path.as_ref();
        match file_loader::load_file(path, &self.options) {
            Ok(text) => Ok(host.set_file_content(path, text)),
            Err(err) => {
                if path.is_file() {
                    host.set_file_unreadable(path);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::SearchScope;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CMakeLists.txt"), "function(top)\nendfunction()\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/CMakeLists.txt"), "macro(sub)\nendmacro()\n").unwrap();

        let mut host = AnalysisHost::new();
        let report = WorkspaceLoader::new()
            .load_directory_into_host(dir.path(), &mut host)
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.loaded.len(), 2);
        assert_eq!(host.analysis().all_definitions(&SearchScope::All).len(), 2);
    }

    #[test]
    fn test_oversized_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ok.cmake"), "function(ok)\nendfunction()").unwrap();
        fs::write(dir.path().join("big.cmake"), "function(big)\nendfunction()").unwrap();

        let loader = WorkspaceLoader::with_options(LoadOptions::default().with_max_file_size(26));
        let mut host = AnalysisHost::new();
        let report = loader.load_directory_into_host(dir.path(), &mut host).unwrap();

        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path(), dir.path().join("big.cmake"));
        assert!(host.file_id(dir.path().join("big.cmake")).is_some());

        let names: Vec<_> = host
            .analysis()
            .all_definitions(&SearchScope::All)
            .iter()
            .map(|d| d.name().to_owned())
            .collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_load_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.cmake");
        fs::write(&path, "macro(m)\nendmacro()").unwrap();

        let mut host = AnalysisHost::new();
        let loader = WorkspaceLoader::new();
        let file = loader.load_file_into_host(&path, &mut host).unwrap();
        assert_eq!(host.analysis().definitions_in_file(file).len(), 1);

        let missing = dir.path().join("missing.cmake");
        assert!(loader.load_file_into_host(&missing, &mut host).is_err());
        assert!(host.file_id(&missing).is_none());
    }
}
