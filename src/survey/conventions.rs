// src/survey/conventions.rs

use std::fmt;

/// Line terminator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfLine {
    Lf,
    Crlf,
}

impl fmt::Display for EndOfLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndOfLine::Lf => "lf",
            EndOfLine::Crlf => "crlf",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Tabs,
    Spaces,
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndentStyle::Tabs => "tabs",
            IndentStyle::Spaces => "spaces",
        })
    }
}

/// The verdicts of a summarized survey. `None` means no consensus was
/// reached, and the rule is left out of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conventions {
    pub insert_final_newline: Option<bool>,
    /// editorconfig name of the dominant charset.
    pub charset: Option<String>,
    /// Human readable breakdown of every charset seen.
    pub charsets: Option<String>,
    pub trim_trailing_whitespace: Option<bool>,
    pub end_of_line: Option<EndOfLine>,
    pub indent_style: Option<IndentStyle>,
    pub indent_size: Option<usize>,
    pub tab_width: Option<usize>,
    pub max_line_length: Option<usize>,
}

fn differing<T: Clone + PartialEq>(own: &Option<T>, baseline: &Option<T>) -> Option<T> {
    if own != baseline {
        own.clone()
    } else {
        None
    }
}

impl Conventions {
    /// Keeps only the verdicts that differ from `baseline`. A verdict shared
    /// with the baseline needs no override.
    ///
    /// # Examples
    /// ```
    /// use ecguess::survey::{Conventions, EndOfLine};
    ///
    /// let overall = Conventions { end_of_line: Some(EndOfLine::Lf), indent_size: Some(4), ..Default::default() };
    /// let group = Conventions { end_of_line: Some(EndOfLine::Lf), indent_size: Some(2), ..Default::default() };
    /// let diff = group.diff(&overall);
    /// assert_eq!(diff.end_of_line, None);
    /// assert_eq!(diff.indent_size, Some(2));
    /// ```
    pub fn diff(&self, baseline: &Conventions) -> Conventions {
        Conventions {
            insert_final_newline: differing(&self.insert_final_newline, &baseline.insert_final_newline),
            charset: differing(&self.charset, &baseline.charset),
            charsets: differing(&self.charsets, &baseline.charsets),
            trim_trailing_whitespace: differing(
                &self.trim_trailing_whitespace,
                &baseline.trim_trailing_whitespace,
            ),
            end_of_line: differing(&self.end_of_line, &baseline.end_of_line),
            indent_style: differing(&self.indent_style, &baseline.indent_style),
            indent_size: differing(&self.indent_size, &baseline.indent_size),
            tab_width: differing(&self.tab_width, &baseline.tab_width),
            max_line_length: differing(&self.max_line_length, &baseline.max_line_length),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Conventions::default()
    }
}

/// Renders the rule lines, one `key = value` per resolved verdict.
impl fmt::Display for Conventions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(charsets) = &self.charsets {
            writeln!(f, "# charsets: {}", charsets)?;
        }
        if let Some(charset) = &self.charset {
            writeln!(f, "charset = {}", charset)?;
        }
        if let Some(eol) = self.end_of_line {
            writeln!(f, "end_of_line = {}", eol)?;
        }
        if let Some(value) = self.insert_final_newline {
            writeln!(f, "insert_final_newline = {}", value)?;
        }
        if let Some(value) = self.trim_trailing_whitespace {
            writeln!(f, "trim_trailing_whitespace = {}", value)?;
        }
        if let Some(style) = self.indent_style {
            writeln!(f, "indent_style = {}", style)?;
        }
        if let Some(size) = self.indent_size {
            writeln!(f, "indent_size = {}", size)?;
        }
        if let Some(width) = self.tab_width {
            writeln!(f, "tab_width = {}", width)?;
        }
        if let Some(max) = self.max_line_length {
            writeln!(f, "max_line_length = {}", max)?;
        }
        Ok(())
    }
}
