//! Command-line configuration for exify.
//!
//! This module provides the CLI surface of the `exify` binary:
//! - Subcommands via clap derive
//! - Environment variables with `EXIFY_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use exify::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.into_command() {
//!     Command::Info(config) => println!("Reading {}", config.path.display()),
//!     Command::Thumbnail(config) => println!("Writing {}", config.output.display()),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `EXIFY_FORMAT` - Output format of `exify info` (default: table)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// =============================================================================
// CLI Arguments
// =============================================================================

/// exify - Read EXIF metadata and embedded thumbnails from JPEG files.
#[derive(Parser, Debug, Clone)]
#[command(name = "exify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Consume the parsed arguments, folding global flags into the command.
    pub fn into_command(self) -> Command {
        match self.command {
            Command::Info(mut config) => {
                config.verbose |= self.verbose;
                Command::Info(config)
            }
            Command::Thumbnail(mut config) => {
                config.verbose |= self.verbose;
                Command::Thumbnail(config)
            }
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the metadata table of a JPEG file.
    Info(InfoConfig),

    /// Write the embedded thumbnail of a JPEG file to disk.
    Thumbnail(ThumbnailConfig),
}

// =============================================================================
// Info Command
// =============================================================================

/// How `exify info` renders the metadata table.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned "name  value" lines
    #[default]
    Table,
    /// A JSON object in tag order
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InfoConfig {
    /// JPEG file to read.
    pub path: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, env = "EXIFY_FORMAT")]
    pub format: OutputFormat,

    /// Also print the frame summary (dimensions, components, coding process).
    #[arg(long, default_value_t = false)]
    pub jpeg: bool,

    #[arg(skip)]
    pub verbose: bool,
}

impl InfoConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("An input file path is required".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Thumbnail Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ThumbnailConfig {
    /// JPEG file to read.
    pub path: PathBuf,

    /// Where to write the thumbnail bytes.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite the output file if it already exists.
    #[arg(long, default_value_t = false)]
    pub force: bool,

    #[arg(skip)]
    pub verbose: bool,
}

impl ThumbnailConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("An input file path is required".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return Err("An output path is required. Set --output".to_string());
        }
        if self.output == self.path {
            return Err("Output path must differ from the input file".to_string());
        }
        if !self.force && self.output.exists() {
            return Err(format!(
                "{} already exists. Use --force to overwrite",
                self.output.display()
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
