//! Defines core data structures shared by the pipeline and every analyzer.
//!
//! A [`File`] is handed to all analyzers of a run; a [`SummaryResult`] is what
//! an analyzer hands back at the end of it.

use crate::constants::BINARY_SNIFF_SIZE;
use crate::errors::{io_error_with_path, Result};
use once_cell::sync::OnceCell;
use std::fmt;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A readable, seekable byte source. Dropping it closes it.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// A tree of files bound to a root: enumerates its regular files and opens them.
///
/// Every call to [`SourceTree::open`] returns an independent handle, so
/// concurrent analyzers never share a read cursor.
pub trait SourceTree: Send + Sync + fmt::Debug {
    /// Root of the tree, for display and error messages.
    fn root(&self) -> &Path;

    /// Relative paths of every regular file, in a stable, deterministic order.
    fn files(&self) -> Box<dyn Iterator<Item = Result<PathBuf>> + '_>;

    /// Opens the file at `relative` for reading.
    fn open(&self, relative: &Path) -> io::Result<Box<dyn ReadSeek>>;

    /// Size in bytes of the file at `relative`.
    fn size(&self, relative: &Path) -> io::Result<u64>;
}

/// A reference to one file of the tree being analyzed.
///
/// The identity is immutable; the size is computed at most once, on first
/// request, even when several analyzer workers ask concurrently.
pub struct File {
    /// Path relative to the tree root.
    pub filename: PathBuf,
    opener: Arc<dyn SourceTree>,
    size: OnceCell<Option<u64>>,
}

impl File {
    pub fn new(filename: impl Into<PathBuf>, opener: Arc<dyn SourceTree>) -> Self {
        Self {
            filename: filename.into(),
            opener,
            size: OnceCell::new(),
        }
    }

    /// Size of the file in bytes, cached. `None` if it cannot be determined.
    pub fn size(&self) -> Option<u64> {
        *self.size.get_or_init(|| match self.opener.size(&self.filename) {
            Ok(size) => Some(size),
            Err(e) => {
                log::debug!("Could not stat '{}': {}", self.filename.display(), e);
                None
            }
        })
    }

    /// Opens an independent handle on the file.
    pub fn open(&self) -> Result<Box<dyn ReadSeek>> {
        self.opener
            .open(&self.filename)
            .map_err(|e| io_error_with_path(e, self.display_path()))
    }

    /// Base name of the file, used for glob matching.
    pub fn base_name(&self) -> String {
        self.filename
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Reads the head of the file and reports whether it looks binary.
    pub fn is_binary(&self) -> Result<bool> {
        let mut handle = self.open()?;
        let mut head = Vec::with_capacity(BINARY_SNIFF_SIZE);
        handle
            .by_ref()
            .take(BINARY_SNIFF_SIZE as u64)
            .read_to_end(&mut head)
            .map_err(|e| io_error_with_path(e, self.display_path()))?;
        Ok(crate::discovery::is_binary_sample(&head))
    }

    /// Path used in messages: root joined with the relative name.
    pub fn display_path(&self) -> PathBuf {
        self.opener.root().join(&self.filename)
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("filename", &self.filename)
            .field("size", &self.size.get())
            .finish()
    }
}

/// Renders the rule lines of one result block.
///
/// Rendering happens after every analyzer has finished, so templates may
/// read state shared with other analyzers (the whole-tree aggregate).
pub trait Template: Send + Sync {
    /// Rule lines, each terminated by `\n`. May be empty.
    fn render(&self) -> Result<String>;
}

/// A fixed document that needs no per-file statistics.
#[derive(Debug, Clone, Copy)]
pub struct StaticTemplate(pub &'static str);

impl Template for StaticTemplate {
    fn render(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Compares two results of the same file type for consolidation across
/// sub-directories. Nothing consults it yet.
pub type Contraster = fn(&SummaryResult, &SummaryResult) -> i32;

/// One emitted rule block.
pub struct SummaryResult {
    /// Globs the block applies to: unique, in insertion order.
    pub file_globs: Vec<String>,
    /// How confident the analyzer is. Not used for ordering yet.
    pub confidence: f64,
    pub contraster: Option<Contraster>,
    pub template: Box<dyn Template>,
    /// Directory scope of the block; always the root for now.
    pub path: String,
    /// Analyzer-private payload for a future contraster.
    pub data: Option<Box<dyn std::any::Any + Send + Sync>>,
}

impl SummaryResult {
    /// A root-scoped result with no extension data.
    pub fn new(file_globs: Vec<String>, confidence: f64, template: Box<dyn Template>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(file_globs.len());
        for glob in file_globs {
            if !unique.contains(&glob) {
                unique.push(glob);
            }
        }
        Self {
            file_globs: unique,
            confidence,
            contraster: None,
            template,
            path: crate::constants::ROOT_PATH.to_string(),
            data: None,
        }
    }

    /// Appends a glob unless it is already present.
    pub fn add_glob(&mut self, glob: &str) {
        if !self.file_globs.iter().any(|g| g == glob) {
            self.file_globs.push(glob.to_string());
        }
    }

    /// The `[...]` section header for this block.
    pub fn scope(&self) -> String {
        match self.file_globs.as_slice() {
            [single] => format!("[{}]", single),
            globs => format!("[{{{}}}]", globs.join(",")),
        }
    }
}

impl fmt::Debug for SummaryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryResult")
            .field("file_globs", &self.file_globs)
            .field("confidence", &self.confidence)
            .field("path", &self.path)
            .finish()
    }
}
