//! Finds schema documents on disk.
//!
//! Directories are walked without following symlinks. Build and VCS
//! directories are skipped, and only `.json`, `.yaml` and `.yml` files are
//! returned.

use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use rawschema::DocumentFormat;
use walkdir::WalkDir;

/// Directories to skip
pub const SKIP_DIRS: &[&str] = &["target", "node_modules", ".git"];

/// A path that could not be walked. Reported as a failure, never dropped.
#[derive(Debug, Clone)]
pub struct WalkFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Returns `true` if the entry should be walked into.
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() > 0
        && entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

/// Compiles `--exclude` globs.
///
/// # Errors
///
/// Returns an error naming the first pattern that is not a valid glob.
pub fn compile_excludes(patterns: &[String]) -> anyhow::Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern '{p}'")))
        .collect()
}

/// Collects schema documents under `roots`, sorted and deduplicated.
///
/// A root that is a file is taken as given, whatever its extension, unless it
/// is excluded. Roots that do not exist and walk errors come back as
/// failures alongside the files that were found.
#[must_use]
pub fn find_documents(roots: &[PathBuf], exclude: &[Pattern]) -> (Vec<PathBuf>, Vec<WalkFailure>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for root in roots {
        if root.is_file() {
            if !matches_exclude(root, exclude) {
                files.push(root.clone());
            }
            continue;
        }

        if !root.is_dir() {
            failures.push(WalkFailure {
                path: root.clone(),
                message: "path does not exist".to_owned(),
            });
            continue;
        }

        for entry_result in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(is_not_skip_dir)
        {
            let entry = match entry_result {
                Ok(e) => e,
                Err(walk_err) => {
                    let path = walk_err
                        .path()
                        .map_or_else(|| root.clone(), Path::to_path_buf);
                    failures.push(WalkFailure {
                        path,
                        message: format!("directory traversal error: {walk_err}"),
                    });
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file()
                || !DocumentFormat::is_schema_path(path)
                || matches_exclude(path, exclude)
            {
                continue;
            }
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!(files = files.len(), failures = failures.len(), "discovered documents");
    (files, failures)
}
