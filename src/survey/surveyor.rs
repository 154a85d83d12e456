// src/survey/surveyor.rs

use crate::constants::{
    CHARSET_CONFIDENCE_THRESHOLD, MAJORITY_THRESHOLD, MINORITY_THRESHOLD, READ_SIZE,
    TRAILING_WHITESPACE_VARIANT_LIMIT,
};
use crate::core_types::File;
use crate::errors::{io_error_with_path, Result};
use crate::survey::charset::{editorconfig_charset, CharsetDetector, CharsetTally, InspectorDetector};
use crate::survey::conventions::{Conventions, EndOfLine, IndentStyle};
use crate::survey::indent::{guess_indent_size, guess_max_line_length, guess_tab_width};
use crate::survey::line_survey::{LineLengthKey, LineSurvey};
use log::{debug, trace};
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use std::sync::{Arc, RwLock};

/// A surveyor shared between the analyzer that feeds it and the templates
/// (and other analyzers) that read its verdicts.
pub type SharedSurveyor = Arc<RwLock<BasicSurveyor>>;

/// Knobs for how files are sampled and judged.
#[derive(Debug, Clone)]
pub struct SurveyOptions {
    /// Bytes sampled from the head of each file.
    pub read_size: usize,
    /// More distinct trailing-whitespace strings than this in one file mean
    /// the file keeps trailing whitespace on purpose.
    pub trailing_whitespace_variant_limit: usize,
    /// Detections at or below this confidence count as unknown.
    pub charset_confidence_threshold: u8,
    pub detector: Arc<dyn CharsetDetector>,
}

impl Default for SurveyOptions {
    fn default() -> Self {
        Self {
            read_size: READ_SIZE,
            trailing_whitespace_variant_limit: TRAILING_WHITESPACE_VARIANT_LIMIT,
            charset_confidence_threshold: CHARSET_CONFIDENCE_THRESHOLD,
            detector: Arc::new(InspectorDetector),
        }
    }
}

/// What was learned from one file.
#[derive(Debug, Clone)]
pub struct FileReading {
    /// Accepted charset name, empty when unknown.
    pub charset: String,
    pub final_newline: bool,
    pub survey: LineSurvey,
}

#[derive(Debug, Clone, Copy, Default)]
struct Balance {
    yes: usize,
    no: usize,
}

impl Balance {
    fn vote(&mut self, yes: bool) {
        if yes {
            self.yes += 1;
        } else {
            self.no += 1;
        }
    }
}

/// Running tallies over many files, and the verdicts drawn from them.
#[derive(Debug)]
pub struct BasicSurveyor {
    options: SurveyOptions,
    /// Files surveyed so far.
    pub files: usize,
    pub charsets: CharsetTally,
    final_newline: Balance,
    trailing_whitespace_okay: Balance,
    windows_files: usize,
    unix_files: usize,
    line_lengths: HashMap<LineLengthKey, usize>,
    whitespace_prefixes: HashMap<String, usize>,
    conventions: Option<Conventions>,
}

impl Default for BasicSurveyor {
    fn default() -> Self {
        Self::new(SurveyOptions::default())
    }
}

fn share(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}

impl BasicSurveyor {
    pub fn new(options: SurveyOptions) -> Self {
        Self {
            options,
            files: 0,
            charsets: CharsetTally::default(),
            final_newline: Balance::default(),
            trailing_whitespace_okay: Balance::default(),
            windows_files: 0,
            unix_files: 0,
            line_lengths: HashMap::new(),
            whitespace_prefixes: HashMap::new(),
            conventions: None,
        }
    }

    pub fn shared(options: SurveyOptions) -> SharedSurveyor {
        Arc::new(RwLock::new(Self::new(options)))
    }

    /// Samples the head of `file`, checks its last byte and folds both into
    /// the tallies. Empty files are skipped and yield `Ok(None)`.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be opened, read or seeked.
    pub fn read_file(&mut self, file: &File) -> Result<Option<FileReading>> {
        let mut handle = file.open()?;
        let mut head = Vec::with_capacity(self.options.read_size.min(64 * 1024));
        handle
            .by_ref()
            .take(self.options.read_size as u64)
            .read_to_end(&mut head)
            .map_err(|e| io_error_with_path(e, file.display_path()))?;
        if head.is_empty() {
            trace!("Skipping empty file {}", file.filename.display());
            return Ok(None);
        }

        let charset = match self.options.detector.detect(&head) {
            Some(detection) if detection.confidence > self.options.charset_confidence_threshold => {
                detection.charset
            }
            _ => String::new(),
        };

        let mut last = [0u8; 1];
        handle
            .seek(SeekFrom::End(-1))
            .and_then(|_| handle.read_exact(&mut last))
            .map_err(|e| io_error_with_path(e, file.display_path()))?;
        let final_newline = last[0] == b'\n';

        let survey = LineSurvey::sample(&head);
        self.record(&charset, final_newline, &survey);
        Ok(Some(FileReading {
            charset,
            final_newline,
            survey,
        }))
    }

    /// Folds one file's observations into the tallies.
    pub fn record(&mut self, charset: &str, final_newline: bool, survey: &LineSurvey) {
        self.files += 1;
        self.charsets.add(charset);
        self.final_newline.vote(final_newline);

        if let Some(windows) = survey.window_ratio() {
            if windows >= MAJORITY_THRESHOLD {
                self.windows_files += 1;
            } else if windows <= MINORITY_THRESHOLD {
                self.unix_files += 1;
            }
        }

        let okay = survey.suffix_variants() <= self.options.trailing_whitespace_variant_limit;
        self.trailing_whitespace_okay.vote(okay);

        for (key, count) in &survey.line_lengths {
            *self.line_lengths.entry(*key).or_insert(0) += count;
        }
        for (prefix, count) in &survey.whitespace_prefix {
            *self.whitespace_prefixes.entry(prefix.clone()).or_insert(0) += count;
        }
    }

    pub fn final_newline_percent(&self) -> Option<f64> {
        share(self.final_newline.yes, self.files)
    }

    pub fn trailing_whitespace_okay_percent(&self) -> Option<f64> {
        share(self.trailing_whitespace_okay.yes, self.files)
    }

    pub fn windows_line_ending_percent(&self) -> Option<f64> {
        share(self.windows_files, self.files)
    }

    pub fn unix_line_ending_percent(&self) -> Option<f64> {
        share(self.unix_files, self.files)
    }

    /// Share of surveyed lines indented with at least one tab.
    pub fn tab_percent(&self) -> Option<f64> {
        let total: usize = self.line_lengths.values().sum();
        let tabbed: usize = self
            .line_lengths
            .iter()
            .filter(|(key, _)| key.tab_depth.tabs().is_some_and(|tabs| tabs > 0))
            .map(|(_, count)| count)
            .sum();
        share(tabbed, total)
    }

    /// Draws the verdicts. Only the first call does any work.
    pub fn summarize(&mut self) {
        if self.conventions.is_some() {
            debug!("Surveyor already summarized, keeping the first verdicts");
            return;
        }
        self.conventions = Some(self.verdicts());
    }

    /// The verdicts, once [`BasicSurveyor::summarize`] has run.
    pub fn conventions(&self) -> Option<&Conventions> {
        self.conventions.as_ref()
    }

    fn verdicts(&self) -> Conventions {
        let mut conventions = Conventions {
            insert_final_newline: majority(self.final_newline_percent()),
            trim_trailing_whitespace: majority(self.trailing_whitespace_okay_percent()),
            charset: self
                .charsets
                .best_fit()
                .and_then(|(name, _)| editorconfig_charset(name))
                .map(str::to_string),
            charsets: (self.charsets.total() > 0).then(|| self.charsets.distribution()),
            ..Conventions::default()
        };

        if self.unix_line_ending_percent().is_some_and(|p| p >= MAJORITY_THRESHOLD) {
            conventions.end_of_line = Some(EndOfLine::Lf);
        } else if self.windows_line_ending_percent().is_some_and(|p| p >= MAJORITY_THRESHOLD) {
            conventions.end_of_line = Some(EndOfLine::Crlf);
        }

        match majority(self.tab_percent()) {
            Some(true) => {
                let (width, max) = guess_tab_width(&self.line_lengths);
                conventions.indent_style = Some(IndentStyle::Tabs);
                conventions.tab_width = Some(width);
                conventions.max_line_length = max;
            }
            Some(false) => {
                conventions.indent_style = Some(IndentStyle::Spaces);
                conventions.max_line_length = guess_max_line_length(&self.line_lengths);
            }
            None => {}
        }
        conventions.indent_size = guess_indent_size(&self.whitespace_prefixes);

        debug!("Summarized {} files: {:?}", self.files, conventions);
        conventions
    }
}

/// `true` at or above the majority threshold, `false` at or below the
/// minority threshold, no verdict in between.
fn majority(share: Option<f64>) -> Option<bool> {
    match share {
        Some(p) if p >= MAJORITY_THRESHOLD => Some(true),
        Some(p) if p <= MINORITY_THRESHOLD => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::MemoryTree;
    use crate::survey::charset::{Detection, UTF_8};

    fn file(tree: &Arc<MemoryTree>, name: &str) -> File {
        File::new(name, tree.clone())
    }

    fn record_many(surveyor: &mut BasicSurveyor, final_newlines: &[bool]) {
        let survey = LineSurvey::sample(b"a\nb\n");
        for &final_newline in final_newlines {
            surveyor.record(UTF_8, final_newline, &survey);
        }
    }

    #[test]
    fn test_final_newline_thresholds() {
        let mut mostly = BasicSurveyor::default();
        record_many(&mut mostly, &[true, true, true, true, false]);
        mostly.summarize();
        assert_eq!(mostly.conventions().and_then(|c| c.insert_final_newline), Some(true));

        let mut split = BasicSurveyor::default();
        record_many(&mut split, &[true, false]);
        split.summarize();
        assert_eq!(split.conventions().and_then(|c| c.insert_final_newline), None);

        let mut never = BasicSurveyor::default();
        record_many(&mut never, &[false, false, false, false, false, true]);
        never.summarize();
        assert_eq!(never.conventions().and_then(|c| c.insert_final_newline), Some(false));
    }

    #[test]
    fn test_no_files_leaves_everything_unresolved() {
        let mut surveyor = BasicSurveyor::default();
        assert!(surveyor.conventions().is_none());
        surveyor.summarize();
        assert_eq!(surveyor.conventions(), Some(&Conventions::default()));
    }

    #[test]
    fn test_summarize_runs_once() {
        let mut surveyor = BasicSurveyor::default();
        record_many(&mut surveyor, &[true]);
        surveyor.summarize();
        record_many(&mut surveyor, &[false, false, false, false, false]);
        surveyor.summarize();
        assert_eq!(surveyor.files, 6);
        assert_eq!(surveyor.conventions().and_then(|c| c.insert_final_newline), Some(true));
    }

    #[test]
    fn test_read_file_collects_votes() -> Result<()> {
        let tree = Arc::new(
            MemoryTree::new()
                .with_file("unix.go", b"package a\n\nfunc A() {\n\treturn\n}\n".to_vec())
                .with_file("dos.go", b"package b\r\n\r\nfunc B() {\r\n\treturn\r\n}".to_vec())
                .with_file("empty.go", Vec::new()),
        );
        let mut surveyor = BasicSurveyor::default();

        let unix = surveyor.read_file(&file(&tree, "unix.go"))?.map(|r| r.final_newline);
        assert_eq!(unix, Some(true));
        let dos = surveyor.read_file(&file(&tree, "dos.go"))?;
        assert!(dos.as_ref().is_some_and(|r| !r.final_newline && r.charset == UTF_8));
        assert!(surveyor.read_file(&file(&tree, "empty.go"))?.is_none());

        assert_eq!(surveyor.files, 2);
        assert_eq!(surveyor.unix_line_ending_percent(), Some(0.5));
        assert_eq!(surveyor.windows_line_ending_percent(), Some(0.5));
        assert_eq!(surveyor.tab_percent(), Some(2.0 / 9.0));

        surveyor.summarize();
        let conventions = surveyor.conventions().cloned().unwrap_or_default();
        assert_eq!(conventions.end_of_line, None);
        assert_eq!(conventions.charset.as_deref(), Some("utf-8"));
        assert_eq!(conventions.charsets.as_deref(), Some("UTF-8 (100.0%)"));
        assert_eq!(conventions.trim_trailing_whitespace, Some(true));
        Ok(())
    }

    #[test]
    fn test_read_file_missing_is_an_error() {
        let tree = Arc::new(MemoryTree::new());
        let mut surveyor = BasicSurveyor::default();
        assert!(surveyor.read_file(&file(&tree, "gone.go")).is_err());
        assert_eq!(surveyor.files, 0);
    }

    #[test]
    fn test_read_size_limits_the_sample() -> Result<()> {
        let tree = Arc::new(MemoryTree::new().with_file("long.txt", b"aaaa\nbbbb\ncccc\n".to_vec()));
        let mut surveyor = BasicSurveyor::new(SurveyOptions {
            read_size: 7,
            ..SurveyOptions::default()
        });
        let reading = surveyor.read_file(&file(&tree, "long.txt"))?;
        assert_eq!(reading.as_ref().map(|r| r.survey.new_lines), Some(1));
        // The final byte is read past the window.
        assert_eq!(reading.map(|r| r.final_newline), Some(true));
        Ok(())
    }

    #[derive(Debug)]
    struct FixedDetector(u8);

    impl CharsetDetector for FixedDetector {
        fn detect(&self, _sample: &[u8]) -> Option<Detection> {
            Some(Detection::new("Shift_JIS", self.0))
        }
    }

    #[test]
    fn test_low_confidence_charset_is_unknown() -> Result<()> {
        let tree = Arc::new(MemoryTree::new().with_file("a.txt", b"text\n".to_vec()));
        for (confidence, expected) in [(80, ""), (81, "Shift_JIS")] {
            let mut surveyor = BasicSurveyor::new(SurveyOptions {
                detector: Arc::new(FixedDetector(confidence)),
                ..SurveyOptions::default()
            });
            let reading = surveyor.read_file(&file(&tree, "a.txt"))?;
            assert_eq!(reading.map(|r| r.charset), Some(expected.to_string()));
            surveyor.summarize();
            // Neither name maps to an editorconfig charset.
            assert_eq!(surveyor.conventions().and_then(|c| c.charset.clone()), None);
        }
        Ok(())
    }

    #[test]
    fn test_trailing_whitespace_variant_limit_is_configurable() {
        let survey = LineSurvey::sample(b"a \nb  \nc\t\nd\n");
        assert_eq!(survey.suffix_variants(), 4);

        let mut default_limit = BasicSurveyor::default();
        default_limit.record(UTF_8, true, &survey);
        default_limit.summarize();
        assert_eq!(
            default_limit.conventions().and_then(|c| c.trim_trailing_whitespace),
            Some(true)
        );

        let mut strict = BasicSurveyor::new(SurveyOptions {
            trailing_whitespace_variant_limit: 3,
            ..SurveyOptions::default()
        });
        strict.record(UTF_8, true, &survey);
        strict.summarize();
        assert_eq!(strict.conventions().and_then(|c| c.trim_trailing_whitespace), Some(false));
    }

    #[test]
    fn test_indentation_verdicts() {
        let tabs = LineSurvey::sample(b"func f() {\n\tif x {\n\t\ty()\n\t}\n}\n");
        let mut surveyor = BasicSurveyor::default();
        surveyor.record(UTF_8, true, &tabs);
        // 3 of 5 lines are tab indented: mixed, no style verdict.
        surveyor.summarize();
        let conventions = surveyor.conventions().cloned().unwrap_or_default();
        assert_eq!(conventions.indent_style, None);
        assert_eq!(conventions.indent_size, Some(1));

        let spaces = LineSurvey::sample(b"def f():\n    if x:\n        y()\n    return\n");
        let mut surveyor = BasicSurveyor::default();
        surveyor.record(UTF_8, true, &spaces);
        surveyor.summarize();
        let conventions = surveyor.conventions().cloned().unwrap_or_default();
        assert_eq!(conventions.indent_style, Some(IndentStyle::Spaces));
        assert_eq!(conventions.indent_size, Some(4));
        assert_eq!(conventions.tab_width, None);
        assert_eq!(conventions.end_of_line, Some(EndOfLine::Lf));
    }
}
