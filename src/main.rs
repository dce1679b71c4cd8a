//! # dir-sizer
//!
//! A fast CLI tool that computes the total size and file count of one or
//! more directory trees.
//!
//! Sub-directories are sized in parallel on a bounded worker pool; files
//! within a directory are summed serially. A run either reports complete
//! totals for a directory or the error that stopped it.
//!
//! ## Features
//!
//! - Parallel traversal with a configurable worker count
//! - Per-directory timeout
//! - Human-readable or JSON output
//! - Persistent configuration via `~/.config/dir-sizer/config.toml`
//!
//! ## Usage
//!
//! ```bash
//! # Size the current directory
//! dir-sizer
//!
//! # Size several trees with 8 workers and a 30 second limit each
//! dir-sizer ~/Projects /var/log --threads 8 --timeout 30s
//!
//! # Machine-readable output
//! dir-sizer --json ~/Downloads
//! ```

mod cli;

use std::{path::PathBuf, process::exit, thread, time::Duration};

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand};
use colored::Colorize;
use dir_sizer::{
    config::{FileConfig, RunOptions},
    fs::LocalDirectory,
    output::{JsonOutput, RootReport, failure_count, render_summary},
    sizer::{Progress, Sizer},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// How often the spinner message is refreshed while a directory is sized.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(50);

/// Entry point for the dir-sizer application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function orchestrates the full pipeline: parse arguments, merge them
/// with the config file, size every requested directory and print the report.
///
/// # Errors
///
/// Returns errors from option parsing, thread-pool creation, JSON
/// serialization, or when at least one directory could not be sized.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Commands::Config { command }) = &args.subcommand {
        return handle_config_command(command);
    }

    let (file_config, config_error) = match FileConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (FileConfig::default(), Some(e)),
    };

    let output = args.output_options(&file_config);
    init_logging(output.verbose);

    if let Some(e) = config_error
        && !output.json
    {
        eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
    }

    let run = args.run_options(&file_config)?;
    let dirs = args.directories(&file_config);

    let sizer = Sizer::new(&run.sizer)?;
    debug!(threads = sizer.threads(), roots = dirs.len(), "Sizer ready");

    let reports = dirs
        .into_iter()
        .map(|dir| size_root(&sizer, &run, dir, output.json))
        .collect::<Result<Vec<_>>>()?;

    if output.json {
        let json = JsonOutput::from_reports(&reports, output.binary);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for report in &reports {
            println!("{}", report.render(output.binary));
        }
        if reports.len() > 1 {
            println!("\n{}", render_summary(&reports, output.binary));
        }
    }

    let failed = failure_count(&reports);
    if failed > 0 {
        bail!(
            "{failed} of {} director{} could not be sized",
            reports.len(),
            if reports.len() == 1 { "y" } else { "ies" }
        );
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output for
/// this crate and everything else stays at `warn`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "warn,dir_sizer=debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Size one root directory, showing a spinner unless `quiet`.
///
/// The run happens on a scoped thread so this thread can keep the spinner
/// message current; the scope guarantees the run has ended before returning.
fn size_root(sizer: &Sizer, run: &RunOptions, dir: PathBuf, quiet: bool) -> Result<RootReport> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let ctx = run.context();
    let progress = Progress::default();
    let root = LocalDirectory::new(&dir);

    let outcome = thread::scope(|scope| {
        let handle = scope.spawn(|| sizer.size_with_progress(&ctx, &root, &progress));

        while !handle.is_finished() {
            spinner.set_message(format!(
                "Sizing {}... {} files in {} directories",
                root.path().display(),
                progress.files(),
                progress.dirs()
            ));
            thread::sleep(PROGRESS_INTERVAL);
        }

        handle
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
    });

    spinner.finish_and_clear();

    Ok(RootReport {
        path: dir,
        outcome,
    })
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# dir-sizer configuration
# All values shown are their defaults. Uncomment and change as needed.

# Default directory to size (defaults to current directory when not set)
# dir = "."

# Or several directories at once
# dirs = ["~/Projects", "~/Downloads"]

[sizing]
# Number of directories sized at the same time (0 = all CPU cores)
# threads = 4

# Give up on a directory after this long (e.g. "500ms", "30s", "5m"; "0" = never)
# timeout = "0"

[output]
# Print a single JSON document instead of human-readable lines
# json = false

# Use binary units (KiB, MiB, GiB) instead of decimal ones (kB, MB, GB)
# binary = false

# Log debug information to stderr
# verbose = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load_from(p)?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_str(val: Option<&str>, default: &str) -> String {
        val.map_or_else(
            || format!("\"{default}\"  (default)"),
            |v| format!("\"{v}\""),
        )
    }
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_usize(val: Option<usize>, default: &str) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }

    let dirs_str = match (&config.dirs, &config.dir) {
        (Some(dirs), _) if !dirs.is_empty() => {
            let items: Vec<String> = dirs
                .iter()
                .map(|p| format!("\"{}\"", p.display()))
                .collect();
            format!("[{}]", items.join(", "))
        }
        (_, Some(dir)) => format!("\"{}\"", dir.display()),
        _ => "\".\"  (default)".to_string(),
    };

    format!(
        "\
dirs          = {dirs}

[sizing]
threads       = {threads}
timeout       = {timeout}

[output]
json          = {json}
binary        = {binary}
verbose       = {verbose}",
        dirs = dirs_str,
        threads = show_usize(config.sizing.threads, "4"),
        timeout = show_str(config.sizing.timeout.as_deref(), "0"),
        json = show_bool(config.output.json, false),
        binary = show_bool(config.output.binary, false),
        verbose = show_bool(config.output.verbose, false),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}
