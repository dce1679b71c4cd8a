//! Sizing configuration.
//!
//! This module defines the options that control how a directory tree is
//! sized: how many frames may run at once and how long a run may take.

use std::time::Duration;

use crate::context::Context;

/// Worker count used when nothing else is configured.
pub const DEFAULT_THREADS: usize = 4;

/// Configuration for the sizer's worker pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizerOptions {
    /// Maximum number of directories sized at the same time (0 = one per CPU core)
    pub threads: usize,
}

impl Default for SizerOptions {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
        }
    }
}

/// Options for one invocation of the CLI.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Worker pool configuration
    pub sizer: SizerOptions,

    /// Deadline applied to each root directory (`None` = no deadline)
    pub timeout: Option<Duration>,
}

impl RunOptions {
    /// A fresh context for sizing one root, carrying the configured deadline.
    #[must_use]
    pub fn context(&self) -> Context {
        self.timeout
            .map_or_else(Context::background, Context::with_timeout)
    }
}
