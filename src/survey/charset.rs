// src/survey/charset.rs

use content_inspector::ContentType;
use std::collections::HashMap;
use std::fmt;
use std::str;

pub const UTF_8: &str = "UTF-8";
pub const UTF_8_BOM: &str = "UTF-8-BOM";
pub const UTF_16BE: &str = "UTF-16BE";
pub const UTF_16LE: &str = "UTF-16LE";
pub const LATIN_1: &str = "ISO-8859-1";

/// A charset guess for one byte sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub charset: String,
    /// 0 to 100.
    pub confidence: u8,
}

impl Detection {
    pub fn new(charset: &str, confidence: u8) -> Self {
        Self {
            charset: charset.to_string(),
            confidence,
        }
    }
}

/// Guesses the character set of a byte sample.
pub trait CharsetDetector: Send + Sync + fmt::Debug {
    /// `None` when the sample is not recognisable text.
    fn detect(&self, sample: &[u8]) -> Option<Detection>;
}

/// Detection based on byte-order marks and UTF-8 validity.
///
/// Text that is not UTF-8 is reported as Latin-1 unless it contains C1
/// control bytes, in which case it is most likely some Windows code page and
/// the guess is made with low confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectorDetector;

impl CharsetDetector for InspectorDetector {
    fn detect(&self, sample: &[u8]) -> Option<Detection> {
        match content_inspector::inspect(sample) {
            ContentType::BINARY => None,
            ContentType::UTF_8_BOM => Some(Detection::new(UTF_8_BOM, 100)),
            ContentType::UTF_16BE => Some(Detection::new(UTF_16BE, 100)),
            ContentType::UTF_16LE => Some(Detection::new(UTF_16LE, 100)),
            ContentType::UTF_32BE => Some(Detection::new("UTF-32BE", 100)),
            ContentType::UTF_32LE => Some(Detection::new("UTF-32LE", 100)),
            ContentType::UTF_8 => Some(guess_unmarked(sample)),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

fn guess_unmarked(sample: &[u8]) -> Detection {
    match str::from_utf8(sample) {
        Ok(_) => Detection::new(UTF_8, 100),
        // A multi-byte sequence cut off by the end of the window.
        Err(e) if e.error_len().is_none() => Detection::new(UTF_8, 100),
        Err(_) if !sample.iter().any(|b| (0x80..=0x9F).contains(b)) => Detection::new(LATIN_1, 85),
        Err(_) => Detection::new("windows-1252", 50),
    }
}

/// Maps a tally name to its editorconfig `charset` value.
pub fn editorconfig_charset(name: &str) -> Option<&'static str> {
    match name {
        UTF_8 => Some("utf-8"),
        UTF_8_BOM => Some("utf-8-bom"),
        UTF_16BE => Some("utf-16be"),
        UTF_16LE => Some("utf-16le"),
        LATIN_1 => Some("latin1"),
        _ => None,
    }
}

/// Number of files seen per charset name. The empty name counts files whose
/// charset could not be determined.
#[derive(Debug, Clone, Default)]
pub struct CharsetTally {
    pub utf8: usize,
    pub utf8_bom: usize,
    pub utf16be: usize,
    pub utf16le: usize,
    pub latin1: usize,
    /// Files counted under any other name, the unknown bucket included.
    pub other_total: usize,
    pub sets: HashMap<String, usize>,
}

impl CharsetTally {
    pub fn add(&mut self, name: &str) {
        match name {
            UTF_8 => self.utf8 += 1,
            UTF_8_BOM => self.utf8_bom += 1,
            UTF_16BE => self.utf16be += 1,
            UTF_16LE => self.utf16le += 1,
            LATIN_1 => self.latin1 += 1,
            other => {
                self.other_total += 1;
                *self.sets.entry(other.to_string()).or_insert(0) += 1;
            }
        }
    }

    pub fn total(&self) -> usize {
        self.utf8 + self.utf8_bom + self.utf16be + self.utf16le + self.latin1 + self.other_total
    }

    /// Non-zero counts, highest first, ties by name.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let named = [
            (UTF_8, self.utf8),
            (UTF_8_BOM, self.utf8_bom),
            (UTF_16BE, self.utf16be),
            (UTF_16LE, self.utf16le),
            (LATIN_1, self.latin1),
        ];
        let mut ranked: Vec<(&str, usize)> = named
            .into_iter()
            .chain(self.sets.iter().map(|(name, count)| (name.as_str(), *count)))
            .filter(|(_, count)| *count > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn best_fit(&self) -> Option<(&str, usize)> {
        self.ranked().into_iter().next()
    }

    /// e.g. `UTF-8 (75.0%), unknown (25.0%)`. Empty when nothing was counted.
    pub fn distribution(&self) -> String {
        let total = self.total();
        self.ranked()
            .into_iter()
            .map(|(name, count)| {
                let name = if name.is_empty() { "unknown" } else { name };
                format!("{} ({:.1}%)", name, count as f64 * 100.0 / total as f64)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
