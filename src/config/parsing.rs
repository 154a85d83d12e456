// src/config/parsing.rs

use crate::errors::{Error, Result};
use byte_unit::Byte;
use std::str::FromStr;

/// Parses a human-readable size such as `"512KiB"`, `"1M"` or `"1024"`.
pub(super) fn parse_size(option: &str, value: &str) -> Result<u64> {
    let bytes = Byte::from_str(value)
        .map_err(|e| Error::Config(format!("Invalid size for {}: '{}' ({})", option, value, e)))?
        .as_u128();
    u64::try_from(bytes)
        .map_err(|_| Error::Config(format!("Size for {} is too large: '{}'", option, value)))
}

/// Parses the optional max size string.
pub(super) fn parse_max_size(max_size: Option<&str>) -> Result<Option<u64>> {
    max_size.map(|s| parse_size("--max-size", s)).transpose()
}

/// Parses the read window, which has to fit in memory.
pub(super) fn parse_read_size(read_size: &str) -> Result<usize> {
    let bytes = parse_size("--read-size", read_size)?;
    usize::try_from(bytes)
        .map_err(|_| Error::Config(format!("--read-size does not fit in memory: '{}'", read_size)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_max_size() -> Result<()> {
        // SI prefix
        assert_eq!(parse_max_size(Some("10k"))?, Some(10 * 1000));
        // Binary prefix
        assert_eq!(parse_max_size(Some("2MiB"))?, Some(2 * 1024 * 1024));
        assert_eq!(parse_max_size(Some("1024"))?, Some(1024));
        assert_eq!(parse_max_size(None)?, None);
        Ok(())
    }

    #[test]
    fn test_parse_invalid_size() {
        let result = parse_max_size(Some("invalid"));
        assert!(matches!(result, Err(Error::Config(message)) if message.contains("--max-size")));
    }

    #[test]
    fn test_parse_read_size() -> Result<()> {
        assert_eq!(parse_read_size("256KiB")?, 256 * 1024);
        Ok(())
    }
}
