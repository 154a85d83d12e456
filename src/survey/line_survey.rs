// src/survey/line_survey.rs

use std::collections::HashMap;

/// Leading-tab classification of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TabDepth {
    /// The leading whitespace mixes tabs with other whitespace.
    Mixed,
    /// Number of leading tabs; `0` when the line is not indented with tabs.
    Tabs(usize),
}

impl TabDepth {
    /// Number of leading tabs, or `None` for a mixed run.
    pub fn tabs(self) -> Option<usize> {
        match self {
            TabDepth::Mixed => None,
            TabDepth::Tabs(n) => Some(n),
        }
    }

    fn of(run: &[char]) -> Self {
        let mut tabs = 0;
        let mut others = 0;
        for &c in run {
            match c {
                '\t' => tabs += 1,
                '\r' => {}
                _ => others += 1,
            }
        }
        if tabs > 0 && others > 0 {
            TabDepth::Mixed
        } else {
            TabDepth::Tabs(tabs)
        }
    }
}

/// Histogram key for a completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineLengthKey {
    /// Length in characters, line terminator excluded.
    pub length: usize,
    pub tab_depth: TabDepth,
}

impl LineLengthKey {
    pub fn new(length: usize, tab_depth: TabDepth) -> Self {
        Self { length, tab_depth }
    }
}

/// Whitespace and length statistics of one byte sample.
///
/// Lines are only counted once terminated by `\n`. An unterminated last line
/// contributes its leading whitespace but neither a length nor a trailing
/// whitespace entry, since the sample window may have cut it short.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSurvey {
    pub new_lines: usize,
    /// Newlines preceded by `\r`.
    pub window_newlines: usize,
    pub whitespace_prefix: HashMap<String, usize>,
    pub whitespace_suffix: HashMap<String, usize>,
    pub line_lengths: HashMap<LineLengthKey, usize>,
}

impl LineSurvey {
    /// Scans `bytes` once and builds the survey. Invalid UTF-8 sequences are
    /// replaced, so each counts as a single character.
    ///
    /// # Examples
    /// ```
    /// use ecguess::survey::LineSurvey;
    ///
    /// let survey = LineSurvey::sample(b"fn main() {\r\n    body();  \r\n}\r\n");
    /// assert_eq!(survey.new_lines, 3);
    /// assert_eq!(survey.window_newlines, 3);
    /// assert_eq!(survey.whitespace_suffix.get("  "), Some(&1));
    /// assert_eq!(survey.whitespace_prefix.get("    "), Some(&1));
    /// ```
    pub fn sample(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let mut survey = Self::default();
        let mut line: Vec<char> = Vec::new();

        for c in text.chars() {
            if c == '\n' {
                survey.finish_line(&line);
                line.clear();
            } else {
                line.push(c);
            }
        }
        if let Some(prefix) = leading_whitespace(&line) {
            *survey.whitespace_prefix.entry(prefix).or_insert(0) += 1;
        }
        survey
    }

    /// Number of distinct trailing-whitespace strings seen.
    pub fn suffix_variants(&self) -> usize {
        self.whitespace_suffix.len()
    }

    /// Share of newlines that were `\r\n`, `None` without any newline.
    pub fn window_ratio(&self) -> Option<f64> {
        if self.new_lines == 0 {
            None
        } else {
            Some(self.window_newlines as f64 / self.new_lines as f64)
        }
    }

    fn finish_line(&mut self, raw: &[char]) {
        self.new_lines += 1;
        let content = match raw.split_last() {
            Some(('\r', rest)) => {
                self.window_newlines += 1;
                rest
            }
            _ => raw,
        };

        let content_start = content.iter().position(|&c| !is_blank(c));
        let suffix_start = content
            .iter()
            .rposition(|&c| !is_blank(c))
            .map_or(0, |last| last + 1);
        let suffix: String = content[suffix_start..].iter().collect();
        *self.whitespace_suffix.entry(suffix).or_insert(0) += 1;

        let run = &content[..content_start.unwrap_or(content.len())];
        let key = LineLengthKey::new(content.len(), TabDepth::of(run));
        *self.line_lengths.entry(key).or_insert(0) += 1;

        if let Some(prefix) = leading_whitespace(content) {
            *self.whitespace_prefix.entry(prefix).or_insert(0) += 1;
        }
    }
}

/// Only spaces, tabs and carriage returns count as whitespace. Other Unicode
/// spaces and form feeds are line content.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Whitespace before the first non-whitespace character, `None` when the
/// line holds nothing else.
fn leading_whitespace(line: &[char]) -> Option<String> {
    line.iter()
        .position(|&c| !is_blank(c))
        .map(|start| line[..start].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(length: usize, tabs: usize) -> LineLengthKey {
        LineLengthKey::new(length, TabDepth::Tabs(tabs))
    }

    #[test]
    fn test_counts_every_newline() {
        let samples: [&[u8]; 4] = [b"", b"\n", b"a\nb\n\n", b"x\r\ny\nz"];
        let expected = [0, 1, 3, 2];
        for (sample, n) in samples.iter().zip(expected) {
            assert_eq!(LineSurvey::sample(sample).new_lines, n);
        }
    }

    #[test]
    fn test_crlf_only_sample() {
        let survey = LineSurvey::sample(b"one \r\ntwo\r\n\tthree\r\n");
        assert_eq!(survey.new_lines, 3);
        assert_eq!(survey.window_newlines, survey.new_lines);
        // The carriage return is not trailing whitespace.
        assert_eq!(survey.whitespace_suffix.get(""), Some(&2));
        assert_eq!(survey.whitespace_suffix.get(" "), Some(&1));
        assert_eq!(survey.line_lengths.get(&key(4, 0)), Some(&1));
        assert_eq!(survey.line_lengths.get(&key(6, 1)), Some(&1));
        assert_eq!(survey.window_ratio(), Some(1.0));
    }

    #[test]
    fn test_clean_sample_has_only_empty_suffixes() {
        let survey = LineSurvey::sample(b"package main\n\nfunc main() {\n\tprintln()\n}\n");
        assert_eq!(survey.whitespace_suffix.len(), 1);
        assert_eq!(survey.whitespace_suffix.get(""), Some(&5));
        assert_eq!(survey.suffix_variants(), 1);
    }

    #[test]
    fn test_unicode_spaces_and_form_feed_are_content() {
        let survey = LineSurvey::sample("a\u{a0}\nb\u{3000}\n\u{c}\n".as_bytes());
        assert_eq!(survey.whitespace_suffix, HashMap::from([(String::new(), 3)]));
        assert_eq!(survey.whitespace_prefix.get(""), Some(&3));

        let indented = LineSurvey::sample("\u{a0}\tx\n".as_bytes());
        assert_eq!(indented.line_lengths.get(&key(3, 0)), Some(&1));
    }

    #[test]
    fn test_leading_whitespace_keys() {
        let survey = LineSurvey::sample(b"a\n  b\n  c\n\td\n");
        assert_eq!(survey.whitespace_prefix.get(""), Some(&1));
        assert_eq!(survey.whitespace_prefix.get("  "), Some(&2));
        assert_eq!(survey.whitespace_prefix.get("\t"), Some(&1));
    }

    #[test]
    fn test_whitespace_only_line() {
        let survey = LineSurvey::sample(b"\t\t\n  \n");
        assert!(survey.whitespace_prefix.is_empty());
        assert_eq!(survey.whitespace_suffix.get("\t\t"), Some(&1));
        assert_eq!(survey.whitespace_suffix.get("  "), Some(&1));
        assert_eq!(survey.line_lengths.get(&key(2, 2)), Some(&1));
        assert_eq!(survey.line_lengths.get(&key(2, 0)), Some(&1));
    }

    #[test]
    fn test_mixed_leading_run_is_ambiguous() {
        let survey = LineSurvey::sample(b"\t  x\n \ty\n");
        let mixed = survey
            .line_lengths
            .iter()
            .filter(|(k, _)| k.tab_depth == TabDepth::Mixed)
            .map(|(_, count)| count)
            .sum::<usize>();
        assert_eq!(mixed, 2);
        assert_eq!(TabDepth::Mixed.tabs(), None);
    }

    #[test]
    fn test_final_line_with_and_without_newline() {
        let terminated = LineSurvey::sample(b"a\n  tail  \n");
        assert_eq!(terminated.new_lines, 2);
        assert_eq!(terminated.whitespace_suffix.get("  "), Some(&1));
        assert_eq!(terminated.line_lengths.get(&key(8, 0)), Some(&1));

        let partial = LineSurvey::sample(b"a\n  tail  ");
        assert_eq!(partial.new_lines, 1);
        assert_eq!(partial.whitespace_prefix.get("  "), Some(&1));
        assert_eq!(partial.whitespace_suffix.get("  "), None);
        assert_eq!(partial.line_lengths.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_counts_as_one_char() {
        let survey = LineSurvey::sample(&[b'c', b'a', b'f', 0xE9, b'\n']);
        assert_eq!(survey.line_lengths.get(&key(4, 0)), Some(&1));
    }
}
