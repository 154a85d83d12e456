// src/analyzers/survey.rs

use crate::analyzers::{AcceptsAggregate, FileRunner, ProvidesAggregate};
use crate::core_types::{File, SummaryResult, Template};
use crate::errors::{Error, Result};
use crate::survey::{BasicSurveyor, SharedSurveyor, SurveyOptions};
use glob::Pattern;
use log::{trace, warn};
use std::sync::{Arc, PoisonError};

/// Feeds matching files into one surveyor per glob group and emits one rule
/// block per group that saw at least one file.
///
/// Two shapes exist. The whole-tree analyzer surveys every file into a single
/// surveyor that is created up front and shared as the aggregate. A per-type
/// analyzer creates its surveyors on first match and renders only the
/// verdicts that differ from the aggregate, once one has been injected.
#[derive(Debug)]
pub struct SurveyAnalyzer {
    groups: Vec<Vec<&'static str>>,
    patterns: Vec<Vec<Pattern>>,
    options: SurveyOptions,
    surveyors: Vec<Option<SharedSurveyor>>,
    aggregate: Option<SharedSurveyor>,
    whole_tree: bool,
    confidence: f64,
}

impl SurveyAnalyzer {
    /// Surveys every file of the tree under the `*` scope.
    pub fn whole_tree(options: SurveyOptions) -> Self {
        let surveyor = BasicSurveyor::shared(options.clone());
        Self {
            groups: vec![vec!["*"]],
            patterns: Vec::new(),
            options,
            surveyors: vec![Some(surveyor)],
            aggregate: None,
            whole_tree: true,
            confidence: 3.0,
        }
    }

    /// Surveys files whose base name matches one of `groups`. A file joins
    /// the first group with a matching glob.
    pub fn per_type(groups: &[&[&'static str]], options: SurveyOptions) -> Self {
        Self {
            groups: groups.iter().map(|group| group.to_vec()).collect(),
            patterns: Vec::new(),
            options,
            surveyors: vec![None; groups.len()],
            aggregate: None,
            whole_tree: false,
            confidence: 1.0,
        }
    }

    fn group_of(&self, name: &str) -> Option<usize> {
        if self.whole_tree {
            return Some(0);
        }
        self.patterns
            .iter()
            .position(|group| group.iter().any(|pattern| pattern.matches(name)))
    }
}

impl FileRunner for SurveyAnalyzer {
    fn init(&mut self) -> Result<Vec<SummaryResult>> {
        if !self.whole_tree {
            self.surveyors = vec![None; self.groups.len()];
        }
        self.patterns = self
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|glob| {
                        Pattern::new(glob).map_err(|source| Error::Pattern {
                            pattern: glob.to_string(),
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<_>>()?;
        Ok(Vec::new())
    }

    fn run_file(&mut self, file: &File) -> Result<Vec<SummaryResult>> {
        let Some(index) = self.group_of(&file.base_name()) else {
            return Ok(Vec::new());
        };
        let options = &self.options;
        let surveyor = self.surveyors[index]
            .get_or_insert_with(|| BasicSurveyor::shared(options.clone()))
            .clone();
        let mut surveyor = surveyor.write().unwrap_or_else(PoisonError::into_inner);
        if surveyor.read_file(file)?.is_none() {
            trace!("{} had nothing to survey", file.filename.display());
        }
        Ok(Vec::new())
    }

    fn end(&mut self) -> Result<Vec<SummaryResult>> {
        let mut results = Vec::new();
        for (group, surveyor) in self.groups.iter().zip(&self.surveyors) {
            let Some(surveyor) = surveyor else {
                continue;
            };
            surveyor.write().unwrap_or_else(PoisonError::into_inner).summarize();
            let template = SurveyTemplate {
                survey: surveyor.clone(),
                baseline: self.aggregate.clone(),
            };
            results.push(SummaryResult::new(
                group.iter().map(|glob| glob.to_string()).collect(),
                self.confidence,
                Box::new(template),
            ));
        }
        Ok(results)
    }

    fn as_aggregate_provider(&self) -> Option<&dyn ProvidesAggregate> {
        self.whole_tree.then_some(self as &dyn ProvidesAggregate)
    }

    fn as_aggregate_acceptor(&mut self) -> Option<&mut dyn AcceptsAggregate> {
        if self.whole_tree {
            None
        } else {
            Some(self)
        }
    }
}

impl ProvidesAggregate for SurveyAnalyzer {
    fn aggregate(&self) -> SharedSurveyor {
        match self.surveyors.first() {
            Some(Some(surveyor)) => surveyor.clone(),
            // Only reachable for a per-type analyzer, which never provides.
            _ => BasicSurveyor::shared(self.options.clone()),
        }
    }
}

impl AcceptsAggregate for SurveyAnalyzer {
    fn accept_aggregate(&mut self, aggregate: SharedSurveyor) {
        self.aggregate = Some(aggregate);
    }
}

/// Renders a summarized survey, diffed against the baseline when there is
/// one. Evaluated after every analyzer has finished.
#[derive(Debug)]
pub struct SurveyTemplate {
    pub survey: SharedSurveyor,
    pub baseline: Option<SharedSurveyor>,
}

impl Template for SurveyTemplate {
    fn render(&self) -> Result<String> {
        let own = self
            .survey
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .conventions()
            .cloned()
            .ok_or_else(|| Error::Render("survey was not summarized".to_string()))?;

        let Some(baseline) = &self.baseline else {
            return Ok(own.to_string());
        };
        if Arc::ptr_eq(baseline, &self.survey) {
            return Ok(own.to_string());
        }
        let baseline = baseline.read().unwrap_or_else(PoisonError::into_inner);
        match baseline.conventions() {
            Some(overall) => Ok(own.diff(overall).to_string()),
            None => {
                warn!("Aggregate survey was not summarized, rendering without diff");
                Ok(own.to_string())
            }
        }
    }
}
