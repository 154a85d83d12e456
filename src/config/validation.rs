// src/config/validation.rs

use crate::errors::{Error, Result};
use std::path::PathBuf;

/// Checks the settings that the individual parsers cannot judge alone.
pub(super) fn validate_options(inputs: &[PathBuf], read_size: usize) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::Config("at least one directory is required".to_string()));
    }
    if let Some(empty) = inputs.iter().find(|p| p.as_os_str().is_empty()) {
        return Err(Error::Config(format!("empty directory name in {:?}", empty)));
    }
    if read_size == 0 {
        return Err(Error::Config("--read-size must be greater than zero".to_string()));
    }
    Ok(())
}
