//! Errors produced while sizing a directory tree.

use thiserror::Error;

use crate::context::ContextError;

/// Failure of a sizing run.
///
/// A run either produces complete totals or exactly one `SizeError`; partial
/// totals are never returned.
#[derive(Debug, Error)]
pub enum SizeError {
    /// The context was cancelled or its deadline passed.
    ///
    /// Reported in preference to any traversal error observed around the
    /// same time.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Listing a directory or reading a file's size failed.
    #[error(transparent)]
    Traversal(#[from] anyhow::Error),

    /// A file handle reported a negative length.
    #[error("file reported a negative size ({size} bytes)")]
    NegativeSize {
        /// The offending length
        size: i64,
    },
}

impl SizeError {
    /// Whether this error comes from the context rather than the tree.
    #[must_use]
    pub const fn is_context(&self) -> bool {
        matches!(self, Self::Context(_))
    }

    /// The context error, if this is one.
    #[must_use]
    pub const fn context_error(&self) -> Option<ContextError> {
        match self {
            Self::Context(err) => Some(*err),
            _ => None,
        }
    }
}
