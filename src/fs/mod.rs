//! Directory and file handles consumed by the sizer.
//!
//! The sizer never touches the filesystem itself. It walks a tree of
//! [`Directory`] handles, each of which lists its immediate children, and
//! asks each [`File`] handle for its length. Two implementations ship with
//! the crate:
//!
//! - [`local`] - handles backed by the real filesystem
//! - [`memory`] - an owned in-memory tree, handy for tests and for callers
//!   that build trees programmatically

use std::{fmt, sync::Arc};

use crate::context::Context;

pub mod local;
pub mod memory;

pub use local::{LocalDirectory, LocalFile};
pub use memory::{MemoryDirectory, MemoryFile};

/// A directory whose immediate children can be listed.
pub trait Directory: Send + Sync + fmt::Debug {
    /// List the immediate sub-directories and files of this directory.
    ///
    /// No ordering is guaranteed for either collection.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error if the directory cannot be listed.
    fn list(&self, ctx: &Context) -> anyhow::Result<Listing>;
}

/// A file whose length can be read.
pub trait File: Send + Sync + fmt::Debug {
    /// Length of the file in bytes.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error if the length cannot be determined.
    fn size(&self, ctx: &Context) -> anyhow::Result<i64>;
}

impl<D: Directory + ?Sized> Directory for Arc<D> {
    fn list(&self, ctx: &Context) -> anyhow::Result<Listing> {
        D::list(self, ctx)
    }
}

impl<F: File + ?Sized> File for Arc<F> {
    fn size(&self, ctx: &Context) -> anyhow::Result<i64> {
        F::size(self, ctx)
    }
}

/// Immediate children of a [`Directory`].
#[derive(Debug, Default)]
pub struct Listing {
    /// Sub-directories
    pub dirs: Vec<Box<dyn Directory>>,

    /// Files
    pub files: Vec<Box<dyn File>>,
}
