// tests/common.rs

use std::fs;
use std::path::Path;
use std::process::Command;

// Helper function to get the binary command
#[allow(dead_code)] // Not every integration test drives the binary.
pub fn ecguess_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ecguess"))
}

/// Writes `content` to `dir/relative`, creating parent directories.
#[allow(dead_code)]
pub fn create_file(dir: &Path, relative: &str, content: &[u8]) -> std::io::Result<()> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
