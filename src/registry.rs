//! Holds the analyzer factories and builds a fresh analyzer set per run.

use crate::analyzers::Container;
use crate::survey::SurveyOptions;
use log::{debug, warn};

/// Builds a new, unstarted analyzer.
pub type AnalyzerFactory = Box<dyn Fn(&SurveyOptions) -> Container + Send + Sync>;

/// The known analyzers, as factories rather than instances, so that every
/// run starts from empty state.
///
/// # Examples
/// ```
/// use ecguess::analyzers::formats;
/// use ecguess::registry::Registry;
/// use ecguess::survey::SurveyOptions;
///
/// let mut registry = Registry::new();
/// formats::register_defaults(&mut registry);
/// let analyzers = registry.instantiate(&SurveyOptions::default());
/// assert_eq!(analyzers[0].name(), "Whole Tree");
/// ```
#[derive(Default)]
pub struct Registry {
    factories: Vec<AnalyzerFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn(&SurveyOptions) -> Container + Send + Sync + 'static,
    {
        self.factories.push(Box::new(factory));
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Creates one analyzer per factory, hands the whole-tree aggregate to
    /// every analyzer that accepts it, and orders them by name, descending.
    ///
    /// If several analyzers provide an aggregate, the last registered wins.
    pub fn instantiate(&self, options: &SurveyOptions) -> Vec<Container> {
        let mut containers: Vec<Container> = self.factories.iter().map(|factory| factory(options)).collect();

        let mut aggregate = None;
        for container in &containers {
            let Some(provided) = container
                .runner()
                .and_then(|runner| runner.as_aggregate_provider())
                .map(|provider| provider.aggregate())
            else {
                continue;
            };
            if aggregate.is_some() {
                warn!(
                    "More than one analyzer provides the aggregate survey, using '{}'",
                    container.name()
                );
            }
            aggregate = Some(provided);
        }

        if let Some(aggregate) = aggregate {
            for container in &mut containers {
                if let Some(acceptor) = container
                    .runner_mut()
                    .and_then(|runner| runner.as_aggregate_acceptor())
                {
                    acceptor.accept_aggregate(aggregate.clone());
                }
            }
        }

        containers.sort_by(|a, b| b.name().cmp(a.name()));
        debug!(
            "Instantiated analyzers: {:?}",
            containers.iter().map(Container::name).collect::<Vec<_>>()
        );
        containers
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("factories", &self.factories.len())
            .finish()
    }
}
