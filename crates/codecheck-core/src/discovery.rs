//! Resolution of a source path into the ordered list of files to check.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::CheckError;

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => tracing::warn!("ignoring invalid exclude pattern '{pattern}': {e}"),
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Collects files under a source path for one checker.
pub struct FileDiscovery {
    extensions: Vec<String>,
    exclude: GlobSet,
}

impl FileDiscovery {
    pub fn new(extensions: &[&str], exclude_patterns: &[String]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            exclude: build_globset(exclude_patterns),
        }
    }

    /// A file source yields itself. A directory is walked recursively in
    /// file-name order, keeping files with a matching extension that no
    /// exclude pattern matches (relative to the source).
    pub fn collect(&self, source: &Path) -> Result<Vec<PathBuf>, CheckError> {
        if !source.exists() {
            return Err(CheckError::SourceNotFound(source.to_path_buf()));
        }
        if source.is_file() {
            return Ok(vec![source.to_path_buf()]);
        }

        let files: Vec<PathBuf> = WalkDir::new(source)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| self.extensions.iter().any(|x| ext == x.as_str()))
            })
            .filter(|e| {
                let rel = e.path().strip_prefix(source).unwrap_or(e.path());
                !self.exclude.is_match(rel)
            })
            .map(|e| e.into_path())
            .collect();

        tracing::debug!(count = files.len(), source = %source.display(), "discovered files");
        Ok(files)
    }
}
