// src/survey/indent.rs

//! Indentation inference over aggregated line histograms.

use crate::constants::{
    DEFAULT_TAB_WIDTH, LINE_LENGTH_BUCKET_WIDTH, MAX_TAB_WIDTH, MIN_MAX_LINE_LENGTH_BUCKET,
};
use crate::survey::line_survey::{LineLengthKey, TabDepth};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

fn bucket_of(effective_length: usize) -> i64 {
    (effective_length as i64 - 1).div_euclid(LINE_LENGTH_BUCKET_WIDTH)
}

fn max_length_for(bucket: i64) -> Option<usize> {
    (bucket >= MIN_MAX_LINE_LENGTH_BUCKET).then(|| ((bucket + 1) * LINE_LENGTH_BUCKET_WIDTH) as usize)
}

fn buckets(
    line_lengths: &HashMap<LineLengthKey, usize>,
    effective: impl Fn(&LineLengthKey) -> usize,
) -> BTreeMap<i64, usize> {
    let mut buckets = BTreeMap::new();
    for (key, count) in line_lengths {
        *buckets.entry(bucket_of(effective(key))).or_insert(0) += count;
    }
    buckets
}

/// Picks the tab width under which tab-indented lines cluster into the
/// fewest 20-column buckets, and the max line length that width implies.
///
/// Ties prefer the larger top bucket, then the larger width. Without a top
/// bucket of at least 80 columns the default width of 8 is returned with no
/// max length.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use ecguess::survey::{guess_tab_width, LineLengthKey, TabDepth};
///
/// let histogram = HashMap::from([
///     (LineLengthKey::new(85, TabDepth::Tabs(0)), 1),
///     (LineLengthKey::new(77, TabDepth::Tabs(1)), 1),
///     (LineLengthKey::new(92, TabDepth::Tabs(2)), 1),
/// ]);
/// assert_eq!(guess_tab_width(&histogram), (4, Some(100)));
/// ```
pub fn guess_tab_width(line_lengths: &HashMap<LineLengthKey, usize>) -> (usize, Option<usize>) {
    let best = (1..=MAX_TAB_WIDTH)
        .filter_map(|width| {
            let histogram = buckets(line_lengths, |key| match key.tab_depth {
                TabDepth::Tabs(tabs) => key.length + tabs * width,
                TabDepth::Mixed => key.length,
            });
            let top = *histogram.keys().next_back()?;
            Some((width, histogram.len(), top))
        })
        .min_by_key(|&(width, distinct, top)| (distinct, Reverse(top), Reverse(width)));

    match best {
        Some((width, _, top)) => match max_length_for(top) {
            Some(max) => (width, Some(max)),
            None => (DEFAULT_TAB_WIDTH, None),
        },
        None => (DEFAULT_TAB_WIDTH, None),
    }
}

/// Max line length from raw character lengths, for space-indented trees.
pub fn guess_max_line_length(line_lengths: &HashMap<LineLengthKey, usize>) -> Option<usize> {
    let histogram = buckets(line_lengths, |key| key.length);
    histogram.keys().next_back().and_then(|&top| max_length_for(top))
}

/// Finds the indentation unit: the leading-whitespace string whose
/// consecutive repetitions (1x, 2x, ...) are all observed for the longest
/// stretch. Returns the unit's length in characters.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use ecguess::survey::guess_indent_size;
///
/// let prefixes = HashMap::from([
///     ("".to_string(), 9),
///     ("  ".to_string(), 5),
///     ("    ".to_string(), 3),
///     ("   ".to_string(), 1),
/// ]);
/// assert_eq!(guess_indent_size(&prefixes), Some(2));
/// ```
pub fn guess_indent_size(prefixes: &HashMap<String, usize>) -> Option<usize> {
    let longest = prefixes.keys().map(|p| p.chars().count()).max().unwrap_or(0);
    let mut units: Vec<&String> = prefixes.keys().filter(|p| !p.is_empty()).collect();
    units.sort();

    let mut best: Option<(usize, usize, usize)> = None;
    for unit in units {
        let unit_len = unit.chars().count();
        let mut run = 0;
        let mut occurrences = 0;
        for times in 1..=longest / unit_len {
            match prefixes.get(&unit.repeat(times)) {
                Some(count) => {
                    run += 1;
                    occurrences += count;
                }
                None => break,
            }
        }
        let better = match best {
            Some((_, best_run, best_occurrences)) => (run, occurrences) > (best_run, best_occurrences),
            None => run > 0,
        };
        if better {
            best = Some((unit_len, run, occurrences));
        }
    }
    best.map(|(unit_len, _, _)| unit_len)
}
