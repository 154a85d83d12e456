// src/output/mod.rs

//! Renders result blocks into the final document and writes documents out.

use crate::constants::ROOT_HEADER;
use crate::core_types::SummaryResult;
use crate::errors::Result;
use std::fmt::Write as _;

pub mod writer;

/// Builds the document: the root header, then one block per result, each
/// opened by its `[scope]` line and separated from the previous one by a
/// blank line.
///
/// # Errors
/// Returns the first template rendering failure.
pub fn render_document(results: &[SummaryResult]) -> Result<String> {
    let mut document = String::from(ROOT_HEADER);
    for result in results {
        let rules = result.template.render()?;
        // Writing to a String cannot fail.
        let _ = write!(document, "\n{}\n{}", result.scope(), rules);
    }
    Ok(document)
}
