//! Concurrent directory-size aggregation.
//!
//! This module provides the core sizing logic: it walks a tree of
//! [`Directory`] handles, sums the files of each directory serially and
//! visits sub-directories in parallel on a bounded worker pool, merging the
//! partial [`Totals`] of every subtree on the way back up.
//!
//! Each directory is handled by one *frame*. A frame lists its directory,
//! sizes the files it contains, fans out one child frame per sub-directory,
//! and returns only once every child has finished. Frames share a single
//! [`Context`]; once it is done no new frame starts any work and the run
//! reports the context's error.
//!
//! Parallel frames nest on the worker's call stack, so fan-out stops after
//! [`MAX_PARALLEL_DEPTH`] levels. A frame at that depth sizes the rest of its
//! subtree itself, keeping pending directories in a heap-allocated stack.
//! Tree depth is therefore limited by memory only.

use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context as _;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use tracing::{debug, trace};

use crate::{
    config::SizerOptions,
    context::Context,
    error::SizeError,
    fs::{Directory, File, LocalDirectory},
    totals::Totals,
};

/// Nesting depth below which sub-directories are sized in parallel.
pub const MAX_PARALLEL_DEPTH: usize = 64;

/// Stack size of every worker thread.
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Computes the total size and file count of directory trees.
///
/// The `Sizer` owns a dedicated thread pool whose size is the parallelism
/// limit for every run: no matter how wide or deep the tree, at most that
/// many frames execute at the same time. Frames waiting on their children
/// lend their thread to queued work, so nested fan-out cannot starve the
/// pool.
///
/// A `Sizer` holds no state between runs and may be shared between threads.
#[derive(Debug)]
pub struct Sizer {
    /// Worker pool bounding concurrent frames
    pool: ThreadPool,
}

impl Sizer {
    /// Create a new sizer with the specified options.
    ///
    /// # Arguments
    ///
    /// * `options` - Parallelism configuration (`threads == 0` uses one
    ///   worker per CPU core)
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dir_sizer::{Sizer, SizerOptions};
    /// let sizer = Sizer::new(&SizerOptions { threads: 4 })?;
    /// assert_eq!(sizer.threads(), 4);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn new(options: &SizerOptions) -> anyhow::Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .stack_size(WORKER_STACK_SIZE)
            .thread_name(|index| format!("dir-sizer-{index}"))
            .build()
            .context("Failed to build the sizing thread pool")?;

        Ok(Self { pool })
    }

    /// Number of worker threads, i.e. the maximum number of frames that
    /// run at once.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Compute the aggregated size and file count of `root`.
    ///
    /// # Errors
    ///
    /// - [`SizeError::Context`] if `ctx` is done before or during the run;
    ///   this takes precedence over any other failure
    /// - [`SizeError::Traversal`] if listing a directory or reading a file
    ///   size failed anywhere in the tree
    /// - [`SizeError::NegativeSize`] if a file handle reported a negative
    ///   length
    ///
    /// No partial totals are returned on failure.
    pub fn size(&self, ctx: &Context, root: &dyn Directory) -> Result<Totals, SizeError> {
        self.size_with_progress(ctx, root, &Progress::default())
    }

    /// Like [`Sizer::size`], reporting counts of visited directories and
    /// sized files into `progress` as the run goes.
    ///
    /// # Errors
    ///
    /// Same as [`Sizer::size`].
    pub fn size_with_progress(
        &self,
        ctx: &Context,
        root: &dyn Directory,
        progress: &Progress,
    ) -> Result<Totals, SizeError> {
        debug!(threads = self.threads(), "Sizing started");

        let walk = Walk { ctx, progress };
        let result = self.pool.install(|| walk.size_dir(root, 0));

        match &result {
            Ok(totals) => debug!(size = totals.size, count = totals.count, "Sizing finished"),
            Err(err) => debug!(error = %err, "Sizing failed"),
        }

        result
    }

    /// Compute the aggregated size of a directory on the local filesystem.
    ///
    /// # Errors
    ///
    /// Same as [`Sizer::size`].
    pub fn size_path(&self, ctx: &Context, path: &Path) -> Result<Totals, SizeError> {
        self.size(ctx, &LocalDirectory::new(path))
    }
}

/// Live counters of a sizing run.
///
/// Updated by worker threads while the run is in progress and safe to read
/// from any thread at any time.
#[derive(Debug, Default)]
pub struct Progress {
    dirs: AtomicU64,
    files: AtomicU64,
}

impl Progress {
    /// Directories listed so far.
    #[must_use]
    pub fn dirs(&self) -> u64 {
        self.dirs.load(Ordering::Relaxed)
    }

    /// Files sized so far.
    #[must_use]
    pub fn files(&self) -> u64 {
        self.files.load(Ordering::Relaxed)
    }
}

/// State shared by every frame of one run.
struct Walk<'a> {
    ctx: &'a Context,
    progress: &'a Progress,
}

impl Walk<'_> {
    /// Size one directory, reporting the context's error whenever it is
    /// done by the time the frame finishes, whatever the frame's outcome.
    fn size_dir(&self, dir: &dyn Directory, depth: usize) -> Result<Totals, SizeError> {
        let result = if depth < MAX_PARALLEL_DEPTH {
            self.size_frame(dir, depth)
        } else {
            self.size_subtree(dir)
        };

        if let Some(err) = self.ctx.err() {
            return Err(err.into());
        }

        if let Err(err) = &result {
            trace!(error = %err, depth, ?dir, "Frame failed");
        }

        result
    }

    fn size_frame(&self, dir: &dyn Directory, depth: usize) -> Result<Totals, SizeError> {
        let (mut totals, dirs) = self.enter(dir)?;

        // try_reduce stops handing out siblings after the first failure and
        // only returns once every started child frame has returned.
        totals += dirs
            .par_iter()
            .map(|child| self.size_dir(child.as_ref(), depth + 1))
            .try_reduce(Totals::default, |a, b| Ok(a + b))?;

        Ok(totals)
    }

    /// Size a whole subtree on the current thread.
    fn size_subtree(&self, dir: &dyn Directory) -> Result<Totals, SizeError> {
        let (mut totals, mut pending) = self.enter(dir)?;

        while let Some(next) = pending.pop() {
            let (files, dirs) = self.enter(next.as_ref())?;
            totals += files;
            pending.extend(dirs);
        }

        Ok(totals)
    }

    /// List `dir` and size its files, handing back its sub-directories.
    fn enter(&self, dir: &dyn Directory) -> Result<(Totals, Vec<Box<dyn Directory>>), SizeError> {
        self.ctx.check()?;

        let listing = dir.list(self.ctx)?;
        self.progress.dirs.fetch_add(1, Ordering::Relaxed);

        let totals = self.size_files(&listing.files)?;

        Ok((totals, listing.dirs))
    }

    fn size_files(&self, files: &[Box<dyn File>]) -> Result<Totals, SizeError> {
        let mut totals = Totals::default();

        for file in files {
            self.ctx.check()?;

            let size = file.size(self.ctx)?;
            if size < 0 {
                return Err(SizeError::NegativeSize { size });
            }

            totals += Totals::file(size);
            self.progress.files.fetch_add(1, Ordering::Relaxed);
        }

        Ok(totals)
    }
}
