// src/constants.rs

/// Header block written at the top of every generated document.
pub const ROOT_HEADER: &str = "# Generated by ecguess from the conventions found in this tree\nroot = true\n";

/// Number of bytes sampled from the head of each surveyed file.
pub const READ_SIZE: usize = 256 * 1024;

/// Number of bytes sniffed when deciding whether a file is binary.
pub const BINARY_SNIFF_SIZE: usize = 1024;

/// Share of votes at or above which a verdict is reached.
pub const MAJORITY_THRESHOLD: f64 = 0.80;

/// Share of votes at or below which the opposite verdict is reached.
pub const MINORITY_THRESHOLD: f64 = 0.20;

/// A file whose lines end in more distinct trailing-whitespace strings than
/// this is considered to use trailing whitespace on purpose.
pub const TRAILING_WHITESPACE_VARIANT_LIMIT: usize = 5;

/// Charset detections at or below this confidence are treated as unknown.
pub const CHARSET_CONFIDENCE_THRESHOLD: u8 = 80;

/// Width, in columns, of a line-length histogram bucket.
pub const LINE_LENGTH_BUCKET_WIDTH: i64 = 20;

/// Lowest bucket index that may be reported as a max line length (80 columns).
pub const MIN_MAX_LINE_LENGTH_BUCKET: i64 = 3;

/// Largest tab width tried when inferring tab width.
pub const MAX_TAB_WIDTH: usize = 8;

/// Tab width reported when no candidate qualifies.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Path scope of every emitted result.
pub const ROOT_PATH: &str = "/";

/// File name written by `--save`.
pub const EDITORCONFIG_FILE_NAME: &str = ".editorconfig";
