//! File synchronization from a template directory into a working repository.
//! Raw files are copied byte for byte, templated files are rendered first.
//! Both keep the permission bits of their source, and missing directories are
//! created with the permission bits of the matching source directory.

use std::fs::{self, DirBuilder, Permissions};
use std::io::ErrorKind;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::Path;

use log::{debug, info};

use crate::classify::classify;
use crate::config::Template;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;

/// Number of files handled per bucket by one synchronization.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub raw: usize,
    pub templated: usize,
    pub skipped: usize,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} copied, {} rendered, {} skipped",
            self.raw, self.templated, self.skipped
        )
    }
}

fn sync_error(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::SyncError { path: path.display().to_string(), reason: e.to_string() }
}

/// Copies the template directory of `template` from `repo_dir` into `dest_root`.
///
/// Stops at the first failure. Files written before the failure are kept.
///
/// # Errors
/// * `Error::SyncError` if a source cannot be read or a destination cannot be written
/// * `Error::TemplateError` if a templated file references an unknown param
pub fn synchronize<P: AsRef<Path>, Q: AsRef<Path>>(
    repo_dir: P,
    template: &Template,
    dest_root: Q,
    renderer: &dyn TemplateRenderer,
) -> Result<SyncReport> {
    let src_root = repo_dir.as_ref().join(&template.directory);
    let dest_root = dest_root.as_ref();
    let classification = classify(repo_dir.as_ref(), template)?;
    let context = template.context();

    let mut report = SyncReport { skipped: classification.skipped.len(), ..Default::default() };

    for file in &classification.raw {
        if copy_raw_file(&src_root, dest_root, file)? {
            report.raw += 1;
        } else {
            report.skipped += 1;
        }
    }

    for file in &classification.templated {
        if render_file(&src_root, dest_root, file, renderer, &context)? {
            report.templated += 1;
        } else {
            report.skipped += 1;
        }
    }

    info!("Synchronized template '{}': {}", template.directory, report);
    Ok(report)
}

/// Returns the permission bits of the regular file at `path`, or `None` for
/// symlinks, devices and other non-regular entries.
fn regular_file_mode(path: &Path) -> Result<Option<u32>> {
    let metadata = fs::symlink_metadata(path).map_err(|e| sync_error(path, e))?;
    if !metadata.file_type().is_file() {
        debug!("Skipping non-regular file {}", path.display());
        return Ok(None);
    }
    Ok(Some(metadata.permissions().mode() & 0o7777))
}

/// Creates every missing ancestor of `rel_dir` below `dest_root`, each with
/// the permission bits of the same directory below `src_root`.
fn ensure_dir_exists(src_root: &Path, dest_root: &Path, rel_dir: &Path) -> Result<()> {
    if rel_dir.as_os_str().is_empty() {
        return Ok(());
    }
    if let Some(parent) = rel_dir.parent() {
        ensure_dir_exists(src_root, dest_root, parent)?;
    }

    let src_dir = src_root.join(rel_dir);
    let mode = fs::metadata(&src_dir)
        .map_err(|e| sync_error(&src_dir, e))?
        .permissions()
        .mode()
        & 0o7777;
    let dest_dir = dest_root.join(rel_dir);
    match DirBuilder::new().mode(mode).create(&dest_dir) {
        Ok(()) => {
            debug!("Created directory {} with mode {:o}", dest_dir.display(), mode);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(sync_error(&dest_dir, e)),
    }
}

fn prepare_destination(src_root: &Path, dest_root: &Path, rel_path: &Path) -> Result<()> {
    match rel_path.parent() {
        Some(parent) => ensure_dir_exists(src_root, dest_root, parent),
        None => Ok(()),
    }
}

fn write_with_mode(dest: &Path, content: &[u8], mode: u32) -> Result<()> {
    fs::write(dest, content).map_err(|e| sync_error(dest, e))?;
    fs::set_permissions(dest, Permissions::from_mode(mode)).map_err(|e| sync_error(dest, e))
}

/// Copies one file verbatim. Returns `false` if the source is not a regular file.
pub fn copy_raw_file(src_root: &Path, dest_root: &Path, rel_path: &Path) -> Result<bool> {
    let src = src_root.join(rel_path);
    let Some(mode) = regular_file_mode(&src)? else {
        return Ok(false);
    };
    prepare_destination(src_root, dest_root, rel_path)?;

    let content = fs::read(&src).map_err(|e| sync_error(&src, e))?;
    let dest = dest_root.join(rel_path);
    write_with_mode(&dest, &content, mode)?;
    debug!("Copied file {} to {}", src.display(), dest.display());
    Ok(true)
}

/// Renders one file into the destination. Returns `false` if the source is
/// not a regular file. Content that is not UTF-8 is copied unchanged.
pub fn render_file(
    src_root: &Path,
    dest_root: &Path,
    rel_path: &Path,
    renderer: &dyn TemplateRenderer,
    context: &serde_json::Value,
) -> Result<bool> {
    let src = src_root.join(rel_path);
    let Some(mode) = regular_file_mode(&src)? else {
        return Ok(false);
    };
    prepare_destination(src_root, dest_root, rel_path)?;

    let dest = dest_root.join(rel_path);
    let bytes = fs::read(&src).map_err(|e| sync_error(&src, e))?;
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            debug!("Copying non UTF-8 file {} without rendering", src.display());
            write_with_mode(&dest, e.as_bytes(), mode)?;
            return Ok(true);
        }
    };
    let rendered = renderer.render(&content, context).map_err(|e| match e {
        Error::TemplateError { reason, .. } => {
            Error::TemplateError { path: rel_path.display().to_string(), reason }
        }
        other => other,
    })?;
    write_with_mode(&dest, rendered.as_bytes(), mode)?;
    debug!("Rendered file {} to {}", src.display(), dest.display());
    Ok(true)
}
