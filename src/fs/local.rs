//! Handles backed by the local filesystem.
//!
//! Listing uses `walkdir` restricted to a single level, without following
//! symbolic links: a symlink is counted as a file of its own length, never
//! descended into. Everything that is not a directory (regular files,
//! symlinks, sockets, FIFOs) is reported as a file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use walkdir::WalkDir;

use super::{Directory, File, Listing};
use crate::context::Context;

/// A directory on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDirectory {
    path: PathBuf,
}

impl LocalDirectory {
    /// Handle for the directory at `path`.
    ///
    /// Nothing is checked until the directory is listed.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this handle refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Directory for LocalDirectory {
    fn list(&self, _ctx: &Context) -> anyhow::Result<Listing> {
        let path = self.path();
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access {}", path.display()))?;
        if !metadata.is_dir() {
            bail!("{} is not a directory", path.display());
        }

        let mut listing = Listing::default();

        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = entry.with_context(|| format!("Failed to list {}", path.display()))?;

            if entry.file_type().is_dir() {
                listing
                    .dirs
                    .push(Box::new(Self::new(entry.into_path())));
            } else {
                listing
                    .files
                    .push(Box::new(LocalFile::new(entry.into_path())));
            }
        }

        Ok(listing)
    }
}

/// A file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    /// Handle for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this handle refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl File for LocalFile {
    fn size(&self, _ctx: &Context) -> anyhow::Result<i64> {
        let path = self.path();
        let metadata = fs::symlink_metadata(path)
            .with_context(|| format!("Failed to read metadata of {}", path.display()))?;

        i64::try_from(metadata.len()).with_context(|| {
            format!(
                "Size of {} does not fit in a signed 64-bit integer",
                path.display()
            )
        })
    }
}
