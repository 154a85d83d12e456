//! `ecguess` is a library and command-line tool that infers the formatting
//! conventions already in use in a source tree and renders them as an
//! `.editorconfig` document.
//!
//! As a library, it provides a small pipeline:
//! 1.  **Discover**: enumerate a tree ([`discovery::DirTree`] or
//!     [`discovery::MemoryTree`]) and drop hidden, ignored, oversized and
//!     binary files ([`discovery::IgnoreRules`]).
//! 2.  **Analyze**: hand every remaining file to every registered analyzer,
//!     each running on its own worker thread ([`pipeline::run_in_tree`]).
//! 3.  **Render**: join the analyzers' results into one document.
//!
//! # Example: Library Usage
//!
//! ```
//! use ecguess::{guess, ConfigBuilder};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().unwrap();
//! fs::write(temp_dir.path().join("main.go"), "package main\n\nfunc main() {\n\tprintln()\n}\n").unwrap();
//! fs::write(temp_dir.path().join("util.go"), "package main\n").unwrap();
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let report = guess(temp_dir.path(), &config).unwrap();
//!
//! assert_eq!(report.files, 2);
//! assert!(report.document.starts_with(ecguess::constants::ROOT_HEADER));
//! assert!(report.document.contains("[*]\n"));
//! assert!(report.document.contains("end_of_line = lf\n"));
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core_types;
pub mod discovery;
pub mod errors;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod survey;

// Re-export key public types for easier use as a library
pub use config::{Config, ConfigBuilder, OutputDestination};
pub use core_types::{File, SourceTree, SummaryResult, Template};
pub use pipeline::Report;
pub use registry::Registry;

use crate::discovery::{DirTree, IgnoreRules};
use crate::errors::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// Analyzes one directory with the built-in analyzers.
///
/// # Errors
/// Returns an error if the ignore rules cannot be loaded or the directory
/// cannot be walked. Per-file failures are reported in [`Report::errors`].
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn guess(dir: &Path, config: &Config) -> Result<Report> {
    let ignore = Arc::new(IgnoreRules::new(dir, &config.discovery)?);
    let pruning = Arc::clone(&ignore);
    let tree = DirTree::new(dir).with_dir_filter(move |relative| pruning.is_excluded_dir(relative));
    let mut registry = Registry::new();
    analyzers::formats::register_defaults(&mut registry);
    pipeline::run_in_tree(Arc::new(tree), &registry, &config.survey, |file| {
        ignore.is_ignored(file)
    })
}

/// Analyzes every configured directory, then writes the documents.
///
/// Nothing is written unless every directory was analyzed successfully.
///
/// # Errors
/// Returns the first fatal error from [`guess`] or from writing the output.
pub fn run(config: &Config) -> Result<Vec<(PathBuf, Report)>> {
    let mut reports = Vec::with_capacity(config.inputs.len());
    for dir in &config.inputs {
        let report = guess(dir, config)?;
        log::debug!("{}: {} files analyzed", dir.display(), report.files);
        reports.push((dir.clone(), report));
    }
    output::writer::write_reports(config, &reports)?;
    Ok(reports)
}
