//! Command-line interface for the tokenbox demo host
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Override precedence (CLI > environment > config file > defaults)

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Tokenizing text entry - interactive terminal demo
#[derive(Parser, Debug)]
#[command(
    name = "tokenbox",
    version,
    about = "Tokenizing text entry with live suggestions",
    long_about = "An interactive terminal host for the tokenbox engine: type values, commit \
them with the configured delimiter, and accept live suggestions drawn from a candidate file."
)]
pub struct CliArgs {
    /// Candidate file (JSON array of strings)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub candidates: Option<PathBuf>,

    /// Delimiter kind (semicolon, comma, pipe, forward-slash, back-slash, custom)
    #[arg(long, value_name = "KIND")]
    pub delimiter: Option<String>,

    /// Separator literal for the custom delimiter kind
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Suggestion matching mode (substring, prefix)
    #[arg(long, value_name = "MODE")]
    pub match_mode: Option<String>,

    /// Match candidates case-insensitively
    #[arg(long)]
    pub case_insensitive: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Verbose output (debug level logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose output (trace level logging)
    #[arg(long)]
    pub very_verbose: bool,
}

/// CLI interface combining parsed arguments and loaded configuration
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Build an interface from pre-parsed arguments (used by tests)
    pub fn with_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration and fold in argument overrides
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = match args.config_file.as_deref() {
            // An explicitly named file must exist and parse
            Some(path) => {
                let mut config = Config::from_file(path)?;
                config.apply_env_overrides()?;
                config
            }
            None => Config::load()?,
        };

        Self::apply_args_to_config(&mut config, args)?;
        Ok(config)
    }

    /// Apply CLI arguments on top of the loaded configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) -> Result<()> {
        if let Some(kind) = &args.delimiter {
            config.delimiter.kind = kind.parse()?;
        }
        if let Some(separator) = &args.separator {
            config.delimiter.custom_separator = Some(separator.clone());
        }
        if let Some(mode) = &args.match_mode {
            config.matching.mode = mode.parse()?;
        }
        if args.case_insensitive {
            config.matching.case_sensitive = false;
        }
        Ok(())
    }

    /// Parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
