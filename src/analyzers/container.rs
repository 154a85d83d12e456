// src/analyzers/container.rs

use crate::analyzers::FileRunner;
use crate::core_types::{File, SummaryResult};
use crate::errors::{Error, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, trace};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Input side of a started analyzer. `None` marks the end of the stream.
pub type FileSender = Sender<Option<Arc<File>>>;

type WorkerOutput = (Vec<SummaryResult>, Vec<Error>);

/// Runs one analyzer on a dedicated worker thread.
///
/// Files are handed over through a rendezvous channel: a send blocks until
/// the worker takes the file, so a slow analyzer slows the traversal down
/// rather than buffering the tree.
pub struct Container {
    name: String,
    runner: Option<Box<dyn FileRunner>>,
    worker: Option<JoinHandle<WorkerOutput>>,
}

impl Container {
    pub fn new(name: impl Into<String>, runner: impl FileRunner + 'static) -> Self {
        Self {
            name: name.into(),
            runner: Some(Box::new(runner)),
            worker: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The analyzer, until the container is started.
    pub fn runner(&self) -> Option<&dyn FileRunner> {
        self.runner.as_deref()
    }

    pub fn runner_mut(&mut self) -> Option<&mut (dyn FileRunner + 'static)> {
        self.runner.as_deref_mut()
    }

    /// Spawns the worker and returns the channel to feed it.
    ///
    /// # Errors
    /// Returns `Error::Spawn` if the thread cannot be created, and
    /// `Error::Config` if the container was already started.
    pub fn start(&mut self) -> Result<FileSender> {
        let runner = self.runner.take().ok_or_else(|| {
            Error::Config(format!("analyzer '{}' was already started", self.name))
        })?;
        let (tx, rx) = bounded(0);
        let name = self.name.clone();
        let worker = thread::Builder::new()
            .name(format!("ecguess-{}", self.name))
            .spawn(move || work(&name, runner, rx))
            .map_err(|source| Error::Spawn {
                name: self.name.clone(),
                source,
            })?;
        self.worker = Some(worker);
        debug!("Started analyzer '{}'", self.name);
        Ok(tx)
    }

    /// Waits for the worker to finish and returns its results, along with
    /// every error it collected joined into one.
    pub fn done(&mut self) -> (Vec<SummaryResult>, Result<()>) {
        let Some(worker) = self.worker.take() else {
            return (Vec::new(), Ok(()));
        };
        match worker.join() {
            Ok((results, errors)) if errors.is_empty() => (results, Ok(())),
            Ok((results, errors)) => (
                results,
                Err(Error::Analyzer {
                    analyzer: self.name.clone(),
                    errors,
                }),
            ),
            Err(_) => (Vec::new(), Err(Error::WorkerPanicked(self.name.clone()))),
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("started", &self.worker.is_some())
            .finish()
    }
}

fn collect(phase: Result<Vec<SummaryResult>>, results: &mut Vec<SummaryResult>, errors: &mut Vec<Error>) {
    match phase {
        Ok(produced) => results.extend(produced),
        Err(e) => errors.push(e),
    }
}

fn work(name: &str, mut runner: Box<dyn FileRunner>, files: Receiver<Option<Arc<File>>>) -> WorkerOutput {
    let mut results = Vec::new();
    let mut errors = Vec::new();

    collect(runner.init(), &mut results, &mut errors);
    let mut seen = 0usize;
    // A closed channel ends the stream just like the sentinel.
    for message in files.iter() {
        let Some(file) = message else {
            break;
        };
        trace!("[{}] {}", name, file.filename.display());
        seen += 1;
        collect(runner.run_file(&file), &mut results, &mut errors);
    }
    drop(files);
    collect(runner.end(), &mut results, &mut errors);

    debug!(
        "Analyzer '{}' saw {} files, produced {} results and {} errors",
        name,
        seen,
        results.len(),
        errors.len()
    );
    (results, errors)
}
