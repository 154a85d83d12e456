// src/output/writer.rs

//! Manages the output destination (stdout or a file) and `.editorconfig` saving.

use crate::config::{Config, OutputDestination};
use crate::constants::EDITORCONFIG_FILE_NAME;
use crate::errors::{io_error_with_path, Result};
use crate::pipeline::Report;
use log::info;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Creates the writer for the configured destination.
///
/// # Errors
/// Returns an error if the output file cannot be created.
pub fn setup_output_writer(destination: &OutputDestination) -> Result<Box<dyn Write + Send>> {
    Ok(match destination {
        OutputDestination::Stdout => Box::new(io::stdout()),
        OutputDestination::File(path) => {
            let file = fs::File::create(path).map_err(|e| io_error_with_path(e, path))?;
            Box::new(BufWriter::new(file))
        }
    })
}

/// Joins the documents of several trees. With more than one tree, each
/// document is preceded by a `# <dir>` line.
pub fn compose(reports: &[(PathBuf, Report)]) -> String {
    match reports {
        [(_, single)] => single.document.clone(),
        many => many
            .iter()
            .map(|(dir, report)| format!("# {}\n{}", dir.display(), report.document))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Writes `document` to `<dir>/.editorconfig`, returning the path written.
pub fn save_document(dir: &Path, document: &str) -> Result<PathBuf> {
    let path = dir.join(EDITORCONFIG_FILE_NAME);
    fs::write(&path, document).map_err(|e| io_error_with_path(e, &path))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Sends every document to the configured destination, then saves each one
/// next to its tree when saving is enabled.
pub fn write_reports(config: &Config, reports: &[(PathBuf, Report)]) -> Result<()> {
    let mut writer = setup_output_writer(&config.output_destination)?;
    let target = match &config.output_destination {
        OutputDestination::Stdout => PathBuf::from("<stdout>"),
        OutputDestination::File(path) => path.clone(),
    };
    writer
        .write_all(compose(reports).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| io_error_with_path(e, &target))?;

    if config.save {
        for (dir, report) in reports {
            save_document(dir, &report.document)?;
        }
    }
    Ok(())
}
