//! Dispatches every file of a tree to every analyzer and joins the results.

use crate::analyzers::FileSender;
use crate::core_types::{File, SourceTree, SummaryResult};
use crate::errors::{Error, Result};
use crate::output::render_document;
use crate::registry::Registry;
use crate::survey::SurveyOptions;
use log::{debug, warn};
use std::sync::Arc;
use tracing::instrument;

/// Outcome of one run over a tree.
#[derive(Debug)]
pub struct Report {
    /// The rendered document.
    pub document: String,
    /// Number of files delivered to the analyzers.
    pub files: usize,
    /// One joined error per analyzer that hit any.
    pub errors: Vec<Error>,
}

/// Runs a fresh set of analyzers from `registry` over `tree`.
///
/// Files for which `ignore` returns `true` are never delivered. Every other
/// file is handed to every analyzer once, in enumeration order. Per-file
/// errors end up in [`Report::errors`] and do not abort the run.
///
/// # Errors
/// Returns the traversal error if the tree cannot be enumerated, and
/// `Error::Spawn` if a worker cannot be started. In both cases every started
/// worker is shut down first and no document is produced.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ecguess::analyzers::formats;
/// use ecguess::discovery::MemoryTree;
/// use ecguess::pipeline::run_in_tree;
/// use ecguess::registry::Registry;
/// use ecguess::survey::SurveyOptions;
///
/// let tree = MemoryTree::new().with_file("main.py", b"def f():\n    pass\n".to_vec());
/// let mut registry = Registry::new();
/// formats::register_defaults(&mut registry);
///
/// let report = run_in_tree(Arc::new(tree), &registry, &SurveyOptions::default(), |_| false).unwrap();
/// assert_eq!(report.files, 1);
/// assert!(report.document.contains("[*.py]\nindent_style = spaces\nindent_size = 4\n"));
/// ```
#[instrument(skip_all, fields(root = %tree.root().display()))]
pub fn run_in_tree<F>(
    tree: Arc<dyn SourceTree>,
    registry: &Registry,
    options: &SurveyOptions,
    ignore: F,
) -> Result<Report>
where
    F: Fn(&File) -> bool,
{
    let mut containers = registry.instantiate(options);

    // --- Dispatching ---
    let mut senders: Vec<FileSender> = Vec::with_capacity(containers.len());
    for index in 0..containers.len() {
        match containers[index].start() {
            Ok(sender) => senders.push(sender),
            Err(e) => {
                drop(senders);
                for started in &mut containers[..index] {
                    let _ = started.done();
                }
                return Err(e);
            }
        }
    }

    let mut files = 0usize;
    let mut walk_error = None;
    for entry in tree.files() {
        let relative = match entry {
            Ok(relative) => relative,
            Err(e) => {
                walk_error = Some(e);
                break;
            }
        };
        let file = Arc::new(File::new(relative, tree.clone()));
        if ignore(&file) {
            continue;
        }
        files += 1;
        for (sender, container) in senders.iter().zip(&containers) {
            if sender.send(Some(file.clone())).is_err() {
                warn!(
                    "Analyzer '{}' stopped early, {} not delivered",
                    container.name(),
                    file.filename.display()
                );
            }
        }
    }

    // --- Draining ---
    for sender in &senders {
        // A worker that already stopped has nothing left to drain.
        let _ = sender.send(None);
    }
    drop(senders);

    // --- Joined ---
    let mut results: Vec<SummaryResult> = Vec::new();
    let mut errors = Vec::new();
    for container in &mut containers {
        let (produced, outcome) = container.done();
        if let Err(e) = outcome {
            warn!("{}", e);
            errors.push(e);
        }
        results.extend(produced);
    }

    if let Some(e) = walk_error {
        return Err(e);
    }

    debug!("Delivered {} files, {} result blocks", files, results.len());
    let document = render_document(&results)?;
    Ok(Report {
        document,
        files,
        errors,
    })
}
