// src/analyzers/presence.rs

use crate::analyzers::FileRunner;
use crate::core_types::{File, StaticTemplate, SummaryResult};
use crate::errors::{Error, Result};
use glob::Pattern;
use std::collections::HashSet;

/// Emits a fixed rule block for a file type as soon as one of its globs
/// matches a file name. File contents are never read.
#[derive(Debug)]
pub struct PresenceAnalyzer {
    globs: Vec<&'static str>,
    template: &'static str,
    patterns: Vec<Pattern>,
    matched: HashSet<usize>,
    summary: Option<SummaryResult>,
}

impl PresenceAnalyzer {
    pub fn new(globs: &[&'static str], template: &'static str) -> Self {
        Self {
            globs: globs.to_vec(),
            template,
            patterns: Vec::new(),
            matched: HashSet::new(),
            summary: None,
        }
    }
}

impl FileRunner for PresenceAnalyzer {
    fn init(&mut self) -> Result<Vec<SummaryResult>> {
        self.matched.clear();
        self.summary = None;
        self.patterns = self
            .globs
            .iter()
            .map(|glob| {
                Pattern::new(glob).map_err(|source| Error::Pattern {
                    pattern: glob.to_string(),
                    source,
                })
            })
            .collect::<Result<_>>()?;
        Ok(Vec::new())
    }

    fn run_file(&mut self, file: &File) -> Result<Vec<SummaryResult>> {
        let name = file.base_name();
        for (index, pattern) in self.patterns.iter().enumerate() {
            if !pattern.matches(&name) || !self.matched.insert(index) {
                continue;
            }
            let glob = pattern.as_str();
            match &mut self.summary {
                Some(summary) => summary.add_glob(glob),
                None => {
                    self.summary = Some(SummaryResult::new(
                        vec![glob.to_string()],
                        1.0,
                        Box::new(StaticTemplate(self.template)),
                    ))
                }
            }
        }
        Ok(Vec::new())
    }

    fn end(&mut self) -> Result<Vec<SummaryResult>> {
        Ok(self.summary.take().into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::MemoryTree;
    use std::sync::Arc;

    fn run(analyzer: &mut PresenceAnalyzer, names: &[&str]) -> Result<Vec<SummaryResult>> {
        let tree = Arc::new(MemoryTree::new());
        analyzer.init()?;
        for name in names {
            analyzer.run_file(&File::new(*name, tree.clone()))?;
        }
        analyzer.end()
    }

    #[test]
    fn test_globs_accumulate_in_match_order() -> Result<()> {
        let mut analyzer = PresenceAnalyzer::new(&["Makefile", "*.mk"], "indent_style = tabs\n");
        let results = run(&mut analyzer, &["src/rules.mk", "README.md", "Makefile", "other.mk"])?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].scope(), "[{*.mk,Makefile}]");
        assert_eq!(results[0].template.render()?, "indent_style = tabs\n");
        Ok(())
    }

    #[test]
    fn test_matches_base_name_only() -> Result<()> {
        let mut analyzer = PresenceAnalyzer::new(&["*.rs"], "");
        assert!(run(&mut analyzer, &["src.rs/README"])?.is_empty());
        assert_eq!(run(&mut analyzer, &["deep/dir/lib.rs"])?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_no_match_no_result() -> Result<()> {
        let mut analyzer = PresenceAnalyzer::new(&["*.py"], "");
        assert!(run(&mut analyzer, &["main.go"])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_glob_is_reported() {
        let mut analyzer = PresenceAnalyzer::new(&["[unclosed"], "");
        assert!(matches!(analyzer.init(), Err(Error::Pattern { .. })));
    }
}
