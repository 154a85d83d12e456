// src/cli.rs

use clap::Parser;

/// Guesses the formatting conventions of a source tree and prints them as an
/// `.editorconfig` document.
///
/// ecguess samples every file under each directory (respecting .gitignore,
/// skipping hidden and binary files), works out line endings, final
/// newlines, trailing whitespace, charset and indentation per file type, and
/// emits one section per type that differs from the tree as a whole.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directories to analyze. Each one gets its own document.
    #[arg(value_name = "DIRECTORIES", default_value = ".", num_args = 1..)]
    pub directories: Vec<String>,

    // --- Output Options ---
    /// Also write each document to <DIR>/.editorconfig.
    #[arg(short = 's', long, action = clap::ArgAction::SetTrue)]
    pub save: bool,

    /// Write the documents to the specified file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<String>,

    /// Log every skipped file and analyzer decision to stderr.
    #[arg(short = 'v', long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,

    // --- Filtering Options ---
    /// Do not respect .gitignore files or .git/info/exclude.
    #[arg(short = 't', long, action = clap::ArgAction::SetTrue)]
    pub no_gitignore: bool,

    /// Also analyze files under hidden (dot-prefixed) directories.
    #[arg(short = 'H', long, action = clap::ArgAction::SetTrue)]
    pub hidden: bool,

    /// Include files detected as binary (default is to skip them).
    #[arg(short = 'B', long, action = clap::ArgAction::SetTrue)]
    pub include_binary: bool,

    /// Maximum file size to analyze (e.g., "1M", "512k"). Larger files are skipped.
    #[arg(short = 'm', long, value_name = "BYTES")]
    pub max_size: Option<String>,

    // --- Sampling Options ---
    /// How much of the head of each file to sample.
    #[arg(long, value_name = "BYTES", default_value = "256KiB")]
    pub read_size: String,

    /// A file with more distinct trailing-whitespace strings than this keeps
    /// its trailing whitespace on purpose.
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub trailing_whitespace_variants: usize,
}
