//! The analyzer contract and the built-in analyzers.
//!
//! An analyzer is a [`FileRunner`]: it is initialised once, sees every file
//! of a run in traversal order, and hands back its [`SummaryResult`]s at the
//! end. A [`Container`] runs one analyzer on its own worker thread.

use crate::core_types::{File, SummaryResult};
use crate::errors::Result;
use crate::survey::SharedSurveyor;

mod container;
pub mod formats;
mod presence;
mod survey;

pub use container::{Container, FileSender};
pub use presence::PresenceAnalyzer;
pub use survey::{SurveyAnalyzer, SurveyTemplate};

/// Three-phase lifecycle run once per analyzer per pipeline run.
///
/// Errors returned by any phase are collected by the [`Container`] and do not
/// stop the analyzer from seeing the remaining files.
pub trait FileRunner: Send {
    /// Allocates per-run state. May already emit results.
    fn init(&mut self) -> Result<Vec<SummaryResult>> {
        Ok(Vec::new())
    }

    /// Called once per delivered file.
    fn run_file(&mut self, file: &File) -> Result<Vec<SummaryResult>>;

    /// Called once after the last file.
    fn end(&mut self) -> Result<Vec<SummaryResult>>;

    /// The analyzer as a supplier of the whole-tree aggregate, if it is one.
    fn as_aggregate_provider(&self) -> Option<&dyn ProvidesAggregate> {
        None
    }

    /// The analyzer as a consumer of the whole-tree aggregate, if it is one.
    fn as_aggregate_acceptor(&mut self) -> Option<&mut dyn AcceptsAggregate> {
        None
    }
}

/// Supplies the surveyor that every file of the tree is folded into.
pub trait ProvidesAggregate {
    fn aggregate(&self) -> SharedSurveyor;
}

/// Diffs its own verdicts against the whole-tree aggregate.
pub trait AcceptsAggregate {
    /// Must be called before the first file is delivered.
    fn accept_aggregate(&mut self, aggregate: SharedSurveyor);
}
