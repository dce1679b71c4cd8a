//! An owned in-memory directory tree.
//!
//! Useful for exercising the sizer without touching disk, including failure
//! injection: any directory or file can be marked as failing, in which case
//! listing it (or reading its size) returns an error carrying the given
//! message.
//!
//! Children are held behind [`Arc`], so listing a directory hands out
//! shared handles instead of copying subtrees.

use std::sync::Arc;

use anyhow::anyhow;

use super::{Directory, File, Listing};
use crate::context::Context;

/// An in-memory directory.
///
/// # Examples
///
/// ```
/// # use dir_sizer::fs::MemoryDirectory;
/// let root = MemoryDirectory::new("root")
///     .with_file("a", 10)
///     .with_file("b", 20)
///     .with_dir(MemoryDirectory::new("sub").with_file("c", 5));
/// assert_eq!(root.file_count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDirectory {
    name: String,
    dirs: Vec<Arc<MemoryDirectory>>,
    files: Vec<Arc<MemoryFile>>,
    failure: Option<String>,
}

impl MemoryDirectory {
    /// An empty directory called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a file of `size` bytes.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, size: i64) -> Self {
        self.files.push(Arc::new(MemoryFile::new(name, size)));
        self
    }

    /// Add an already-built file handle (e.g. a failing one).
    #[must_use]
    pub fn with_file_handle(mut self, file: MemoryFile) -> Self {
        self.files.push(Arc::new(file));
        self
    }

    /// Add a sub-directory.
    #[must_use]
    pub fn with_dir(mut self, dir: Self) -> Self {
        self.dirs.push(Arc::new(dir));
        self
    }

    /// Make listing this directory fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Directory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of files in the whole subtree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len() + self.dirs.iter().map(|d| d.file_count()).sum::<usize>()
    }

    /// Sum of the file sizes in the whole subtree, saturating like
    /// [`Totals`](crate::Totals).
    #[must_use]
    pub fn total_size(&self) -> i64 {
        let files = self
            .files
            .iter()
            .fold(0_i64, |acc, f| acc.saturating_add(f.size));

        self.dirs
            .iter()
            .fold(files, |acc, d| acc.saturating_add(d.total_size()))
    }
}

impl Directory for MemoryDirectory {
    fn list(&self, _ctx: &Context) -> anyhow::Result<Listing> {
        if let Some(message) = &self.failure {
            return Err(anyhow!("{}: {message}", self.name));
        }

        Ok(Listing {
            dirs: self
                .dirs
                .iter()
                .map(|d| Box::new(Arc::clone(d)) as Box<dyn Directory>)
                .collect(),
            files: self
                .files
                .iter()
                .map(|f| Box::new(Arc::clone(f)) as Box<dyn File>)
                .collect(),
        })
    }
}

/// An in-memory file of a fixed size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    size: i64,
    failure: Option<String>,
}

impl MemoryFile {
    /// A file called `name` of `size` bytes.
    #[must_use]
    pub fn new(name: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            size,
            failure: None,
        }
    }

    /// Make reading this file's size fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// File name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl File for MemoryFile {
    fn size(&self, _ctx: &Context) -> anyhow::Result<i64> {
        self.failure
            .as_ref()
            .map_or(Ok(self.size), |message| Err(anyhow!("{}: {message}", self.name)))
    }
}
