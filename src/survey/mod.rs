//! Infers formatting conventions from file contents.
//!
//! Each file is reduced to a [`LineSurvey`] (whitespace and length
//! histograms), folded into a [`BasicSurveyor`] together with its charset and
//! final-newline observations, and finally summarized into [`Conventions`].

mod charset;
mod conventions;
mod indent;
mod line_survey;
mod surveyor;

pub use charset::{
    editorconfig_charset, CharsetDetector, CharsetTally, Detection, InspectorDetector, LATIN_1,
    UTF_16BE, UTF_16LE, UTF_8, UTF_8_BOM,
};
pub use conventions::{Conventions, EndOfLine, IndentStyle};
pub use indent::{guess_indent_size, guess_max_line_length, guess_tab_width};
pub use line_survey::{LineLengthKey, LineSurvey, TabDepth};
pub use surveyor::{BasicSurveyor, FileReading, SharedSurveyor, SurveyOptions};
