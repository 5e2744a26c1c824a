//! File classification for template directories.
//! Splits every file below a template directory into raw-copy, templated and
//! skipped (init-only on update) buckets using glob patterns, in the same way
//! ignore patterns are compiled into a `GlobSet`.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::debug;
use walkdir::WalkDir;

use crate::config::Template;
use crate::error::{Error, Result};

/// Result of classifying a template directory. Every file appears in exactly
/// one of the lists; paths are relative to the template directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    pub raw: Vec<PathBuf>,
    pub templated: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Compiles glob patterns into a set.
///
/// `*` never crosses a path separator and `**` matches any number of
/// directories, so `VERSION` matches only at the root and `**/*.sh` matches
/// at any depth.
///
/// # Errors
/// * `Error::GlobError` if a pattern is invalid
pub fn build_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

/// Lists every non-directory entry below `root`, relative to it and sorted.
///
/// Symlinks are listed but not followed; they are skipped when copying.
pub fn list_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::ConfigError(format!(
            "template directory {} does not exist",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        files.push(relative.to_path_buf());
    }
    Ok(files)
}

/// Checks that the template directory exists below `repo_dir` and that its
/// raw-copy and init-only patterns compile, before anything is written.
///
/// # Errors
/// * `Error::ConfigError` for a missing directory or an invalid pattern
pub fn check_sources<P: AsRef<Path>>(repo_dir: P, template: &Template) -> Result<()> {
    let src_root = repo_dir.as_ref().join(&template.directory);
    if !src_root.is_dir() {
        return Err(Error::ConfigError(format!(
            "template directory {} does not exist",
            src_root.display()
        )));
    }
    for (key, patterns) in [
        ("raw-copy", &template.raw_copy_globs),
        ("init-only", &template.init_only_globs),
    ] {
        build_glob_set(patterns).map_err(|e| {
            Error::ConfigError(format!(
                "template '{}' has an invalid {} pattern: {}",
                template.directory, key, e
            ))
        })?;
    }
    Ok(())
}

/// Classifies the files of `template.directory` below `repo_dir`.
///
/// Raw-copy selection happens first. On update, init-only files are then
/// removed from both the raw and the templated lists.
pub fn classify<P: AsRef<Path>>(repo_dir: P, template: &Template) -> Result<Classification> {
    let src_root = repo_dir.as_ref().join(&template.directory);
    let raw_set = build_glob_set(&template.raw_copy_globs)?;
    let init_only_set = build_glob_set(&template.init_only_globs)?;

    let mut classification = Classification::default();
    for file in list_files(&src_root)? {
        if template.is_update && init_only_set.is_match(&file) {
            debug!("Skipping init-only file {}", file.display());
            classification.skipped.push(file);
        } else if raw_set.is_match(&file) {
            classification.raw.push(file);
        } else {
            classification.templated.push(file);
        }
    }

    debug!(
        "Classified {} raw, {} templated, {} skipped",
        classification.raw.len(),
        classification.templated.len(),
        classification.skipped.len()
    );
    Ok(classification)
}
