//! # dir-sizer
//!
//! Compute the total byte size and file count of a directory tree by
//! visiting sub-directories in parallel and merging partial results.
//!
//! The sizer works on abstract [`Directory`] and [`File`] handles, so the
//! same code sizes a real directory ([`fs::LocalDirectory`]), an in-memory
//! tree ([`fs::MemoryDirectory`]) or any other hierarchy a caller can list.
//! Parallelism is bounded by the worker count given in [`SizerOptions`], and
//! every run observes a shared [`Context`] for cancellation and deadlines.
//!
//! ```
//! use dir_sizer::{Context, Sizer, SizerOptions, Totals, fs::MemoryDirectory};
//!
//! let root = MemoryDirectory::new("root")
//!     .with_file("a", 10)
//!     .with_file("b", 20)
//!     .with_dir(MemoryDirectory::new("sub").with_file("c", 5));
//!
//! let sizer = Sizer::new(&SizerOptions::default())?;
//! let totals = sizer.size(&Context::background(), &root)?;
//! assert_eq!(totals, Totals { size: 35, count: 3 });
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod output;
pub mod sizer;
pub mod totals;
pub mod utils;

pub use config::{OutputOptions, RunOptions, SizerOptions};
pub use context::{Context, ContextError};
pub use error::SizeError;
pub use fs::{Directory, File, Listing};
pub use sizer::{Progress, Sizer};
pub use totals::Totals;
