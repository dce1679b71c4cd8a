//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library. It provides structured access
//! to user input and handles argument defaults.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use dir_sizer::config::file::{FileConfig, expand_tilde};
use dir_sizer::config::{DEFAULT_THREADS, OutputOptions, RunOptions, SizerOptions};
use dir_sizer::utils::parse_timeout;

/// Command-line arguments for controlling how directories are sized.
#[derive(Parser)]
struct SizingArgs {
    /// The number of directories to size at the same time
    ///
    /// A value of 0 uses one worker per CPU core. Defaults to 4.
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Give up on a directory after this long (e.g. 500ms, 30s, 5m, 1h)
    ///
    /// A plain number is interpreted as seconds. A value of 0 disables the
    /// timeout.
    #[arg(long)]
    timeout: Option<String>,
}

/// Command-line arguments for controlling output.
#[derive(Parser)]
struct OutputArgs {
    /// Output results as a single JSON object for scripting/piping
    ///
    /// When enabled, all human-readable output (colors, progress spinner)
    /// is suppressed and a single JSON document is printed to stdout.
    #[arg(long)]
    json: bool,

    /// Use binary units (KiB, MiB, GiB) instead of decimal ones (kB, MB, GB)
    #[arg(short = 'b', long)]
    binary: bool,

    /// Log debug information to stderr
    ///
    /// The `RUST_LOG` environment variable takes precedence when set.
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values act as
/// defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "dir-sizer")]
#[command(about = "Compute the total size and file count of directory trees in parallel")]
#[command(version)]
pub(crate) struct Cli {
    /// Subcommand (e.g. `config`)
    #[command(subcommand)]
    pub(crate) subcommand: Option<Commands>,

    /// One or more directories to size
    ///
    /// Defaults to the current directory if not specified.
    #[arg(num_args = 0..)]
    dirs: Vec<PathBuf>,

    /// Sizing options
    #[command(flatten)]
    sizing: SizingArgs,

    /// Output options
    #[command(flatten)]
    output: OutputArgs,
}

impl Cli {
    /// Resolve the target directories from CLI args, config file, or default.
    ///
    /// Priority: CLI arguments > config file `dirs` > config file `dir` > current directory (`.`).
    /// Tilde expansion is applied to paths originating from the config file.
    #[must_use]
    pub(crate) fn directories(&self, config: &FileConfig) -> Vec<PathBuf> {
        if !self.dirs.is_empty() {
            return self.dirs.clone();
        }

        if let Some(ref dirs) = config.dirs
            && !dirs.is_empty()
        {
            return dirs.iter().map(|d| expand_tilde(d)).collect();
        }

        if let Some(ref dir) = config.dir {
            return vec![expand_tilde(dir)];
        }

        vec![PathBuf::from(".")]
    }

    /// Extract output options from CLI args and config file.
    ///
    /// For each flag, `true` on the command line wins, then the config file
    /// value, then `false`.
    #[must_use]
    pub(crate) fn output_options(&self, config: &FileConfig) -> OutputOptions {
        OutputOptions {
            json: self.output.json || config.output.json.unwrap_or(false),
            binary: self.output.binary || config.output.binary.unwrap_or(false),
            verbose: self.output.verbose || config.output.verbose.unwrap_or(false),
        }
    }

    /// Extract sizing options from CLI args and config file.
    ///
    /// - **threads**: CLI > config > [`DEFAULT_THREADS`]
    /// - **timeout**: CLI > config > none
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout string cannot be parsed.
    pub(crate) fn run_options(&self, config: &FileConfig) -> Result<RunOptions> {
        let threads = self
            .sizing
            .threads
            .or(config.sizing.threads)
            .unwrap_or(DEFAULT_THREADS);

        let timeout = self
            .sizing
            .timeout
            .as_deref()
            .or(config.sizing.timeout.as_deref())
            .map(|raw| parse_timeout(raw).with_context(|| format!("Invalid timeout '{raw}'")))
            .transpose()?
            .flatten();

        Ok(RunOptions {
            sizer: SizerOptions { threads },
            timeout,
        })
    }
}
