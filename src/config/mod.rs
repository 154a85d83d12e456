//! Defines the core `Config` struct and related types for application configuration.
//!
//! Settings come either from the command line ([`ConfigBuilder::from_cli`]) or
//! from the builder's setters, and are validated once in
//! [`ConfigBuilder::build`].

use crate::survey::SurveyOptions;
use std::path::PathBuf;

pub use builder::ConfigBuilder;
mod builder;
mod parsing;
mod validation;

/// Which files the ignore predicate lets through.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Whether to honour `.gitignore` files and `.git/info/exclude`.
    pub use_gitignore: bool,
    /// Whether to analyze files under hidden (dot-prefixed) path segments.
    pub include_hidden: bool,
    /// Whether to analyze files that look binary.
    pub include_binary: bool,
    /// Files larger than this many bytes are skipped.
    pub max_size: Option<u64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            use_gitignore: true,
            include_hidden: false,
            include_binary: false,
            max_size: None,
        }
    }
}

/// Represents the destination for the generated documents.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OutputDestination {
    /// Write to standard output.
    Stdout,
    /// Write to the specified file path.
    File(PathBuf),
}

/// Holds all validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directories to analyze, each independently.
    pub inputs: Vec<PathBuf>,
    /// Also write each document to `<dir>/.editorconfig`.
    pub save: bool,
    pub output_destination: OutputDestination,
    pub verbose: bool,
    pub discovery: DiscoveryConfig,
    /// Sampling settings handed to every surveyor.
    pub survey: SurveyOptions,
}
