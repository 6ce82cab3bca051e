//!
//! Command-line front end for the specgrid analysis pipeline.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use clap::{Parser, Subcommand};

use log::info;
use specgrid_algorithms::{ModuleSummary, PeakConfig};
use specgrid_io::{
    labels, AnalysisConfig, Analyzer, DataSource, ExtractorConfig, ModuleExtractor, RowScanner,
    TableWriter, DEFAULT_MARKER,
};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    SpecgridIo(#[from] specgrid_io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pixel-detector spectrum grid analyzer.
#[derive(Parser)]
#[command(name = "specgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract all modules, transform them and write per-module summary CSVs
    Process {
        /// Input delimited export file
        input: PathBuf,

        /// Output directory for per-module CSV files
        #[arg(short, long)]
        output: PathBuf,

        /// Marker substring naming the pixel-id column
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,

        /// Peak center bin (enables the peak-count pass)
        #[arg(long)]
        bin_peak: Option<usize>,

        /// Peak window half-width in bins
        #[arg(long, default_value = "25")]
        bin_width: usize,

        /// Peak detection threshold (enables the bin-max pass)
        #[arg(long)]
        threshold: Option<u64>,

        /// Number of leading modules to skip (background captures)
        #[arg(long, default_value = "0")]
        skip_modules: usize,

        /// Print per-module summaries as JSON
        #[arg(long)]
        json: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show structure information about an export file
    Info {
        /// Input delimited export file
        input: PathBuf,

        /// Marker substring naming the pixel-id column
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,
    },

    /// Print values for a metadata label
    Metadata {
        /// Input delimited export file
        input: PathBuf,

        /// Label substring to search for (e.g. "stage_x_mm:")
        label: String,

        /// Print only the Nth (0-based) occurrence
        #[arg(long)]
        occurrence: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Process { verbose: true, .. } => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Process {
            input,
            output,
            marker,
            bin_peak,
            bin_width,
            threshold,
            skip_modules,
            json,
            verbose,
        } => {
            if verbose {
                eprintln!("Processing: {}", input.display());
                eprintln!("Marker: {marker:?}");
                if let Some(peak) = bin_peak {
                    eprintln!("Peak window: {} +/- {} bins", peak, bin_width);
                }
            }

            let peak = bin_peak.map(|bin_peak| {
                let config = PeakConfig::new(bin_peak).with_bin_width(bin_width);
                match threshold {
                    Some(threshold) => config.with_threshold(threshold),
                    None => config,
                }
            });
            let config = AnalysisConfig {
                extractor: ExtractorConfig {
                    target: marker,
                    ..ExtractorConfig::default()
                },
                peak,
                skip_modules,
            };

            let start = Instant::now();
            let analyzer = Analyzer::open(&input, config)?;
            let tables = analyzer.run()?;

            if tables.is_empty() {
                println!("No modules found in {}", input.display());
                return Ok(());
            }

            std::fs::create_dir_all(&output)?;
            let mut summaries = Vec::with_capacity(tables.len());
            for (index, table) in tables.iter().enumerate() {
                let path = output.join(format!("module_{index:02}.csv"));
                let mut writer = TableWriter::create(&path)?;
                writer.write_table(table)?;
                info!("wrote {}", path.display());
                summaries.push(ModuleSummary::from_table(table));
            }

            let elapsed = start.elapsed();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for (index, summary) in summaries.iter().enumerate() {
                    println!(
                        "module {}: sum {} counts, max {}, avg {}",
                        index,
                        summary.sum_total_counts,
                        summary.max_total_counts,
                        summary.avg_total_counts
                    );
                }
            }
            println!(
                "Processed {} module(s) in {:.2}s",
                tables.len(),
                elapsed.as_secs_f64()
            );
        }

        Commands::Info { input, marker } => {
            let source = DataSource::open(&input)?;
            println!("File: {}", input.display());
            println!(
                "Size: {} bytes ({:.2} MB)",
                source.len(),
                source.len() as f64 / 1_000_000.0
            );
            println!("Rows: {}", RowScanner::count_rows(&source)?);

            let markers = RowScanner::find_marker_rows(&source, &marker)?;
            println!("Marker rows: {markers:?}");

            let modules = ModuleExtractor::new().with_target(marker).extract(&source)?;
            println!("Modules: {}", modules.len());
            for (index, module) in modules.iter().enumerate() {
                println!(
                    "  module {}: header row {}, {} bins x {} pixels",
                    index,
                    module.marker_row,
                    module.bin_count(),
                    module.row_count()
                );
            }

            for label in [
                labels::STAGE_X_MM,
                labels::STAGE_Y_MM,
                labels::STAGE_X_PX,
                labels::STAGE_Y_PX,
                labels::HEIGHT,
            ] {
                let values = RowScanner::find_label_values(&source, label)?;
                if !values.is_empty() {
                    println!("Metadata {label:?}: {} value(s)", values.len());
                }
            }
        }

        Commands::Metadata {
            input,
            label,
            occurrence,
        } => {
            let source = DataSource::open(&input)?;
            if let Some(occurrence) = occurrence {
                match RowScanner::find_label_value(&source, &label, occurrence)? {
                    Some(value) => println!("{value}"),
                    None => println!("occurrence {occurrence} of {label:?} not found"),
                }
            } else {
                let values = RowScanner::find_label_values(&source, &label)?;
                if values.is_empty() {
                    println!("{label:?} not found");
                }
                for value in values {
                    println!("{}", value.as_deref().unwrap_or("<missing value>"));
                }
            }
        }
    }

    Ok(())
}
