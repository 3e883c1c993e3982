//! exify - Read EXIF metadata and embedded thumbnails from JPEG files.
//!
//! This binary parses the command line, configures logging and dispatches to
//! the extraction facade.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exify::{
    config::{Cli, Command, InfoConfig, OutputFormat, ThumbnailConfig},
    describe_jpeg, extract_metadata, extract_thumbnail, ImageInfo, JpegSummary,
};

/// Exit code when the input has no embedded thumbnail.
const EXIT_NO_THUMBNAIL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Info(config) => run_info(config),
        Command::Thumbnail(config) => run_thumbnail(config),
    }
}

// =============================================================================
// Info Command
// =============================================================================

fn run_info(config: InfoConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let info = match extract_metadata(&config.path) {
        Ok(info) => info,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let summary = if config.jpeg {
        match describe_jpeg(&config.path) {
            Ok(summary) => summary,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    match config.format {
        OutputFormat::Table => print_table(&info, summary.as_ref()),
        OutputFormat::Json => {
            let json = match summary {
                Some(summary) => serde_json::json!({ "exif": info, "jpeg": summary }),
                None => serde_json::json!(info),
            };
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!("Failed to serialize output: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_table(info: &ImageInfo, summary: Option<&JpegSummary>) {
    if info.is_empty() {
        println!("(no EXIF metadata)");
    }

    let width = info.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in info.iter() {
        println!("{:<width$}  {}", name, value, width = width);
    }

    if let Some(summary) = summary {
        println!();
        println!("JPEG frame");
        println!("──────────");
        println!("  Size:       {} x {}", summary.width, summary.height);
        println!(
            "  Components: {} ({})",
            summary.components,
            if summary.is_color() { "color" } else { "grayscale" }
        );
        println!("  Precision:  {} bits", summary.precision);
        println!("  File size:  {} bytes", summary.file_size);
        if let Some(quality) = summary.quality {
            println!("  Quality:    {}", quality);
        }
        if let Some(process) = summary.process {
            println!("  Process:    {}", process);
        }
        for comment in &summary.comments {
            println!("  Comment:    {}", comment);
        }
    }
}

// =============================================================================
// Thumbnail Command
// =============================================================================

fn run_thumbnail(config: ThumbnailConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let thumbnail = match extract_thumbnail(&config.path) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            eprintln!("{}: no embedded thumbnail", config.path.display());
            return ExitCode::from(EXIT_NO_THUMBNAIL);
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::write(&config.output, &thumbnail) {
        error!("Failed to write {}: {}", config.output.display(), e);
        return ExitCode::FAILURE;
    }

    debug!(
        bytes = thumbnail.len(),
        output = %config.output.display(),
        "Wrote thumbnail"
    );
    println!("{} bytes -> {}", thumbnail.len(), config.output.display());

    ExitCode::SUCCESS
}

// =============================================================================
// Logging
// =============================================================================

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "exify=debug" } else { "exify=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
