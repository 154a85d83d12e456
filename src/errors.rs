//! Defines application-specific error types.
//!
//! Per-file failures (I/O, glob syntax) are collected by the analyzer that hit
//! them and surfaced as a single [`Error::Analyzer`] when the pipeline joins
//! that analyzer. Traversal failures are fatal and abort the run.

use std::fmt;
use thiserror::Error;

/// Errors used throughout `ecguess`.
#[derive(Error, Debug)]
pub enum Error {
    // --- I/O Errors ---
    /// Error occurring while opening, reading or seeking a file.
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// A glob pattern used to select files could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The directory traversal failed. Fatal for the whole run.
    #[error("Failed to walk '{root}': {source}")]
    Walk {
        root: String,
        #[source]
        source: walkdir::Error,
    },

    /// A `.gitignore` (or exclude) file could not be loaded.
    #[error("Failed to load ignore rules from '{path}': {source}")]
    Ignore {
        path: String,
        #[source]
        source: ignore::Error,
    },

    // --- Configuration Errors ---
    /// Invalid configuration settings or combinations.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A summary template could not be rendered.
    #[error("Failed to render template: {0}")]
    Render(String),

    // --- Pipeline Errors ---
    /// All errors collected by one analyzer during a run.
    #[error("{analyzer} errors: {}", JoinedErrors(.errors))]
    Analyzer { analyzer: String, errors: Vec<Error> },

    /// An analyzer worker thread could not be started.
    #[error("Failed to start worker for analyzer '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// An analyzer worker thread panicked before returning its results.
    #[error("Analyzer '{0}' worker panicked")]
    WorkerPanicked(String),
}

/// A `Result` alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

struct JoinedErrors<'a>(&'a [Error]);

impl fmt::Display for JoinedErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// Helper function to create an `Error::Io` with path context.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}
