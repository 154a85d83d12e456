// src/config/builder.rs

use super::{
    parsing::{parse_max_size, parse_read_size},
    validation::validate_options,
    Config, DiscoveryConfig, OutputDestination,
};
use crate::cli::Cli;
use crate::errors::Result;
use crate::survey::SurveyOptions;
use std::path::PathBuf;

/// Builds a [`Config`] from the command line or programmatically.
///
/// Unset options keep their command-line defaults.
///
/// # Examples
/// ```
/// use ecguess::config::{ConfigBuilder, OutputDestination};
///
/// let config = ConfigBuilder::new()
///     .inputs(vec!["src".to_string()])
///     .max_size("1MiB")
///     .build()
///     .unwrap();
/// assert_eq!(config.output_destination, OutputDestination::Stdout);
/// assert_eq!(config.discovery.max_size, Some(1024 * 1024));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    inputs: Option<Vec<String>>,
    save: Option<bool>,
    output_file: Option<String>,
    verbose: Option<bool>,
    use_gitignore: Option<bool>,
    include_hidden: Option<bool>,
    include_binary: Option<bool>,
    max_size: Option<String>,
    read_size: Option<String>,
    trailing_whitespace_variants: Option<usize>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder with every option given on the command line.
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            inputs: Some(cli.directories),
            save: Some(cli.save),
            output_file: cli.output_file,
            verbose: Some(cli.verbose),
            use_gitignore: Some(!cli.no_gitignore),
            include_hidden: Some(cli.hidden),
            include_binary: Some(cli.include_binary),
            max_size: cli.max_size,
            read_size: Some(cli.read_size),
            trailing_whitespace_variants: Some(cli.trailing_whitespace_variants),
        }
    }

    /// Directories to analyze. Defaults to the current directory.
    pub fn inputs(mut self, inputs: Vec<String>) -> Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn save(mut self, save: bool) -> Self {
        self.save = Some(save);
        self
    }

    /// Writes the documents to this file instead of stdout.
    pub fn output_file(mut self, path: impl Into<String>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn use_gitignore(mut self, use_gitignore: bool) -> Self {
        self.use_gitignore = Some(use_gitignore);
        self
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = Some(include_hidden);
        self
    }

    pub fn include_binary(mut self, include_binary: bool) -> Self {
        self.include_binary = Some(include_binary);
        self
    }

    /// Skips files larger than this size (e.g. `"512k"`).
    pub fn max_size(mut self, size: impl Into<String>) -> Self {
        self.max_size = Some(size.into());
        self
    }

    /// How much of the head of each file is sampled (e.g. `"64KiB"`).
    pub fn read_size(mut self, size: impl Into<String>) -> Self {
        self.read_size = Some(size.into());
        self
    }

    pub fn trailing_whitespace_variants(mut self, limit: usize) -> Self {
        self.trailing_whitespace_variants = Some(limit);
        self
    }

    /// Parses and validates the collected options.
    ///
    /// # Errors
    /// Returns `Error::Config` for malformed sizes, an empty directory list or
    /// a zero read window.
    pub fn build(self) -> Result<Config> {
        let inputs: Vec<PathBuf> = self
            .inputs
            .unwrap_or_else(|| vec![".".to_string()])
            .into_iter()
            .map(PathBuf::from)
            .collect();

        let defaults = SurveyOptions::default();
        let read_size = match self.read_size.as_deref() {
            Some(size) => parse_read_size(size)?,
            None => defaults.read_size,
        };
        validate_options(&inputs, read_size)?;

        let discovery = DiscoveryConfig {
            use_gitignore: self.use_gitignore.unwrap_or(true),
            include_hidden: self.include_hidden.unwrap_or(false),
            include_binary: self.include_binary.unwrap_or(false),
            max_size: parse_max_size(self.max_size.as_deref())?,
        };

        let survey = SurveyOptions {
            read_size,
            trailing_whitespace_variant_limit: self
                .trailing_whitespace_variants
                .unwrap_or(defaults.trailing_whitespace_variant_limit),
            ..defaults
        };

        Ok(Config {
            inputs,
            save: self.save.unwrap_or(false),
            output_destination: match self.output_file {
                Some(path) => OutputDestination::File(PathBuf::from(path)),
                None => OutputDestination::Stdout,
            },
            verbose: self.verbose.unwrap_or(false),
            discovery,
            survey,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{READ_SIZE, TRAILING_WHITESPACE_VARIANT_LIMIT};
    use crate::errors::Error;
    use clap::Parser;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = ConfigBuilder::new().build()?;
        assert_eq!(config.inputs, vec![PathBuf::from(".")]);
        assert_eq!(config.output_destination, OutputDestination::Stdout);
        assert!(!config.save);
        assert!(!config.verbose);
        assert!(config.discovery.use_gitignore);
        assert!(!config.discovery.include_hidden);
        assert!(!config.discovery.include_binary);
        assert_eq!(config.discovery.max_size, None);
        assert_eq!(config.survey.read_size, READ_SIZE);
        assert_eq!(
            config.survey.trailing_whitespace_variant_limit,
            TRAILING_WHITESPACE_VARIANT_LIMIT
        );
        Ok(())
    }

    #[test]
    fn test_from_cli() -> Result<()> {
        let cli = Cli::parse_from([
            "ecguess", "a", "b", "-s", "-o", "out.txt", "-v", "-t", "-H", "-B", "-m", "10k",
            "--read-size", "4KiB", "--trailing-whitespace-variants", "2",
        ]);
        let config = ConfigBuilder::from_cli(cli).build()?;
        assert_eq!(config.inputs, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(config.save);
        assert!(config.verbose);
        assert_eq!(
            config.output_destination,
            OutputDestination::File(PathBuf::from("out.txt"))
        );
        assert!(!config.discovery.use_gitignore);
        assert!(config.discovery.include_hidden);
        assert!(config.discovery.include_binary);
        assert_eq!(config.discovery.max_size, Some(10_000));
        assert_eq!(config.survey.read_size, 4096);
        assert_eq!(config.survey.trailing_whitespace_variant_limit, 2);
        Ok(())
    }

    #[test]
    fn test_cli_defaults_match_builder_defaults() -> Result<()> {
        let from_cli = ConfigBuilder::from_cli(Cli::parse_from(["ecguess"])).build()?;
        let built = ConfigBuilder::new().build()?;
        assert_eq!(from_cli.inputs, built.inputs);
        assert_eq!(from_cli.survey.read_size, built.survey.read_size);
        assert_eq!(
            from_cli.survey.trailing_whitespace_variant_limit,
            built.survey.trailing_whitespace_variant_limit
        );
        Ok(())
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        assert!(matches!(
            ConfigBuilder::new().max_size("lots").build(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ConfigBuilder::new().read_size("0").build(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            ConfigBuilder::new().inputs(Vec::new()).build(),
            Err(Error::Config(_))
        ));
    }
}
