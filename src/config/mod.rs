//! Configuration types: the persistent config file and the resolved options
//! handed to the sizer and the report renderer.

pub mod file;
pub mod output;
pub mod sizing;

pub use file::FileConfig;
pub use output::OutputOptions;
pub use sizing::{DEFAULT_THREADS, RunOptions, SizerOptions};
