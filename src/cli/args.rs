//! Command-line argument definitions for athena-read
//!
//! Defines the CLI interface using the clap derive API.

use crate::config::{CompressionAlgorithm, ExportConfig, OutputFormat, ReadConfig};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Read Athena++ .tab, .hst and .dat outputs and export them as tables
#[derive(Debug, Clone, Parser)]
#[command(
    name = "athena-read",
    version,
    about = "Read Athena++ text outputs and export them as CSV or Parquet",
    long_about = "Reads Athena++ tabular snapshots (.tab), history logs (.hst) and plain numeric \
                  tables (.dat). History logs are consolidated so that data left behind by \
                  restarted runs is replaced by the most recent run."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Read a snapshot (.tab) file
    Tab(FileArgs),
    /// Read a history (.hst) file
    Hst(HstArgs),
    /// Read a headerless numeric (.dat) file
    Dat(FileArgs),
    /// Export every .tab and .hst file under a directory
    Convert(ConvertArgs),
}

/// Arguments shared by the single-file commands
#[derive(Debug, Clone, ClapArgs)]
pub struct FileArgs {
    /// File to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the table here; the format follows the extension (.csv or .parquet).
    /// Without it a summary is printed.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Fail if any value is NaN
    #[arg(long)]
    pub check_nan: bool,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy", value_parser = parse_compression)]
    pub compression: CompressionAlgorithm,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct HstArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Keep records from earlier runs instead of pruning restart branches
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ConvertArgs {
    /// Directory containing Athena++ outputs (searched recursively)
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Directory for exported tables (defaults to DIR)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Parquet)]
    pub format: FormatArg,

    /// Keep records from earlier runs in history logs
    #[arg(long)]
    pub raw: bool,

    /// Fail a file if any value is NaN
    #[arg(long)]
    pub check_nan: bool,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy", value_parser = parse_compression)]
    pub compression: CompressionAlgorithm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Parquet => OutputFormat::Parquet,
        }
    }
}

fn parse_compression(value: &str) -> Result<CompressionAlgorithm, String> {
    CompressionAlgorithm::parse(value).ok_or_else(|| {
        format!(
            "unknown compression '{}' (expected snappy, zstd, lz4 or none)",
            value
        )
    })
}

impl Args {
    /// Get the log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl FileArgs {
    pub fn read_config(&self) -> ReadConfig {
        ReadConfig {
            validate_nan: self.check_nan,
            raw: false,
        }
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::default().with_compression(self.compression)
    }
}

impl HstArgs {
    pub fn read_config(&self) -> ReadConfig {
        ReadConfig {
            raw: self.raw,
            ..self.file.read_config()
        }
    }
}

impl ConvertArgs {
    pub fn read_config(&self) -> ReadConfig {
        ReadConfig {
            validate_nan: self.check_nan,
            raw: self.raw,
        }
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::default()
            .with_format(self.format.into())
            .with_compression(self.compression)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| self.dir.clone())
    }
}
