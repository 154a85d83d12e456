// src/discovery/tree.rs

use crate::core_types::{ReadSeek, SourceTree};
use crate::errors::{Error, Result};
use log::{trace, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Cursor};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

type DirFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// A directory on disk.
///
/// Files are listed depth-first, each directory level sorted by file name.
/// `.git` directories are never entered.
#[derive(Clone)]
pub struct DirTree {
    root: PathBuf,
    prune: Option<DirFilter>,
}

impl DirTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prune: None,
        }
    }

    /// Skips every directory, relative to the root, for which `prune`
    /// returns `true`. Nothing below a pruned directory is listed.
    pub fn with_dir_filter(mut self, prune: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        self.prune = Some(Arc::new(prune));
        self
    }

    fn is_pruned(&self, entry: &walkdir::DirEntry) -> bool {
        if !entry.file_type().is_dir() || entry.depth() == 0 {
            return false;
        }
        if entry.file_name() == ".git" {
            return true;
        }
        let (Some(prune), Ok(relative)) = (&self.prune, entry.path().strip_prefix(&self.root)) else {
            return false;
        };
        let pruned = prune(relative);
        if pruned {
            trace!("Pruned {}", relative.display());
        }
        pruned
    }
}

impl fmt::Debug for DirTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirTree")
            .field("root", &self.root)
            .field("pruned", &self.prune.is_some())
            .finish()
    }
}

impl SourceTree for DirTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn files(&self) -> Box<dyn Iterator<Item = Result<PathBuf>> + '_> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        Box::new(walker.filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_file() => {
                match entry.path().strip_prefix(&self.root) {
                    Ok(relative) => {
                        trace!("Enumerated {}", relative.display());
                        Some(Ok(relative.to_path_buf()))
                    }
                    Err(e) => {
                        warn!(
                            "Failed to strip prefix '{}' from '{}': {}",
                            self.root.display(),
                            entry.path().display(),
                            e
                        );
                        None
                    }
                }
            }
            Ok(_) => None,
            // The root itself is unreadable: nothing sensible can be produced.
            Err(e) if e.depth() == 0 => Some(Err(Error::Walk {
                root: self.root.display().to_string(),
                source: e,
            })),
            Err(e) => {
                warn!("Skipping unreadable entry under '{}': {}", self.root.display(), e);
                None
            }
        }))
    }

    fn open(&self, relative: &Path) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(fs::File::open(self.root.join(relative))?))
    }

    fn size(&self, relative: &Path) -> io::Result<u64> {
        Ok(fs::metadata(self.root.join(relative))?.len())
    }
}

/// An in-memory tree, listed in path order.
///
/// Useful for tests and for callers that already hold file contents.
///
/// # Examples
/// ```
/// use ecguess::discovery::MemoryTree;
/// use ecguess::core_types::SourceTree;
///
/// let tree = MemoryTree::new()
///     .with_file("src/main.go", b"package main\n".to_vec())
///     .with_file("go.mod", b"module example\n".to_vec());
/// let files: Vec<_> = tree.files().collect::<Result<_, _>>().unwrap();
/// assert_eq!(files.len(), 2);
/// assert_eq!(files[0].to_str(), Some("go.mod"));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTree {
    root: PathBuf,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("memory"),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, relative: impl Into<PathBuf>, content: Vec<u8>) -> Self {
        self.insert(relative, content);
        self
    }

    pub fn insert(&mut self, relative: impl Into<PathBuf>, content: Vec<u8>) {
        self.files.insert(relative.into(), content);
    }

    fn content(&self, relative: &Path) -> io::Result<&Vec<u8>> {
        self.files.get(relative).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file in memory tree: {}", relative.display()),
            )
        })
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree for MemoryTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn files(&self) -> Box<dyn Iterator<Item = Result<PathBuf>> + '_> {
        Box::new(self.files.keys().cloned().map(Ok))
    }

    fn open(&self, relative: &Path) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(Cursor::new(self.content(relative)?.clone())))
    }

    fn size(&self, relative: &Path) -> io::Result<u64> {
        Ok(self.content(relative)?.len() as u64)
    }
}
