//! File system utilities for staging a release.
//!
//! Provides the single-file copy used for every required artifact, the
//! recursive folder copy with its two layout modes, and idempotent directory
//! helpers used when cleaning the output tree.

use crate::error::{ErrorExt, ReleaseError, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// How a folder copy lays out files under the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyMode {
    /// Every file lands directly in the destination. Same-named files
    /// overwrite each other; the last one visited wins.
    Flatten,
    /// The source directory nesting is mirrored under the destination.
    PreserveStructure,
}

impl CopyMode {
    /// Directory that receives a file whose parent, relative to the source
    /// root, is `relative_parent`.
    fn destination_dir(self, destination: &Path, relative_parent: &Path) -> PathBuf {
        match self {
            CopyMode::Flatten => destination.to_path_buf(),
            CopyMode::PreserveStructure => destination.join(relative_parent),
        }
    }
}

/// One folder staging operation.
#[derive(Clone, Debug)]
pub struct CopySpec {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: CopyMode,
    /// Files whose name ends with any of these are skipped.
    pub exclude_suffixes: Vec<String>,
}

impl CopySpec {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, mode: CopyMode) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            mode,
            exclude_suffixes: Vec::new(),
        }
    }

    /// Adds file name suffixes to skip.
    pub fn exclude<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_suffixes
            .extend(suffixes.into_iter().map(Into::into));
        self
    }

    fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}

/// Outcome of [`copy_folder`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Files written to the destination (overwrites included).
    pub copied: usize,
    /// Files skipped by suffix.
    pub excluded: usize,
    /// The source folder did not exist and nothing was done.
    pub source_missing: bool,
}

/// Ensures `path` and its parents exist.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes `path` (if present) and creates it again, empty.
pub async fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_all(path).await?;
    ensure_dir(path).await
}

/// Copies a regular file, overwriting `to`.
///
/// The bytes are written to a hidden sibling of `to` first and renamed into
/// place, so a failed copy never leaves a truncated destination. Parent
/// directories of `to` are created as needed.
///
/// Fails with [`ReleaseError::MissingSource`] before writing anything if
/// `from` does not exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !fs::try_exists(from).await.unwrap_or(false) {
        return Err(ReleaseError::MissingSource {
            path: from.to_path_buf(),
        });
    }

    let file_name = to.file_name().ok_or_else(|| ReleaseError::Io {
        context: "copy destination has no file name".to_string(),
        path: to.to_path_buf(),
        source: io::Error::from(io::ErrorKind::InvalidInput),
    })?;
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating destination directory", dest_dir)?;
    }

    let mut partial_name = std::ffi::OsString::from(".");
    partial_name.push(file_name);
    partial_name.push(".partial");
    let partial = to.with_file_name(partial_name);

    if let Err(e) = fs::copy(from, &partial).await {
        let _ = fs::remove_file(&partial).await;
        return Err(e).fs_context("copying file", from);
    }
    if let Err(e) = fs::rename(&partial, to).await {
        let _ = fs::remove_file(&partial).await;
        return Err(e).fs_context("moving copied file into place", to);
    }

    log::info!("Copied: {} -> {}", from.display(), to.display());
    Ok(())
}

/// Recursively copies the contents of `spec.source` into `spec.destination`.
///
/// A missing source folder is tolerated: a warning is logged, the destination
/// is left untouched and the summary reports `source_missing`. Entries are
/// visited depth-first in lexicographic file name order, which makes flatten
/// collisions deterministic.
pub async fn copy_folder(spec: &CopySpec) -> Result<CopySummary> {
    if !fs::try_exists(&spec.source).await.unwrap_or(false) {
        log::warn!("Warning: missing folder: {}", spec.source.display());
        return Ok(CopySummary {
            source_missing: true,
            ..Default::default()
        });
    }

    let entries = list_entries(&spec.source).await?;
    ensure_dir(&spec.destination).await?;

    let mut summary = CopySummary::default();
    for (relative, is_dir) in entries {
        if is_dir {
            if spec.mode == CopyMode::PreserveStructure {
                ensure_dir(&spec.destination.join(&relative)).await?;
            }
            continue;
        }

        let Some(file_name) = relative.file_name() else {
            continue;
        };
        if spec.is_excluded(&file_name.to_string_lossy()) {
            log::debug!("Skipping excluded file: {}", relative.display());
            summary.excluded += 1;
            continue;
        }

        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        let target_dir = spec.mode.destination_dir(&spec.destination, parent);
        copy_file(&spec.source.join(&relative), &target_dir.join(file_name)).await?;
        summary.copied += 1;
    }

    Ok(summary)
}

/// Lists every entry under `root` as `(path relative to root, is_dir)` in
/// traversal order.
async fn list_entries(root: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let root = root.to_path_buf();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || {
        if !root.is_dir() {
            return Err(ReleaseError::Io {
                context: "folder copy source is not a directory".to_string(),
                path: root.clone(),
                source: io::Error::from(io::ErrorKind::InvalidInput),
            });
        }

        let mut entries = Vec::new();
        for entry in walkdir::WalkDir::new(&root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                ReleaseError::Io {
                    context: "walking folder".to_string(),
                    path,
                    source: e.into(),
                }
            })?;
            let relative = entry
                .path()
                .strip_prefix(&root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path().to_path_buf());
            entries.push((relative, entry.file_type().is_dir()));
        }
        Ok(entries)
    })
    .await
    .map_err(|e| ReleaseError::Io {
        context: format!("directory walk task panicked: {e}"),
        path: PathBuf::new(),
        source: io::Error::other(e.to_string()),
    })?
}
