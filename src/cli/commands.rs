//! Command implementations for the athena-read CLI
//!
//! Runs the readers, prints summaries and exports tables, with progress
//! reporting for directory conversion.

use crate::cli::args::{Args, Commands, ConvertArgs, FileArgs, HstArgs};
use crate::config::{ExportConfig, ReadConfig};
use crate::constants::{HST_EXTENSION, TAB_EXTENSION};
use crate::dat::{DatOptions, load_dat};
use crate::frame::{
    export_path, history_to_frame, numeric_to_frame, snapshot_to_frame, write_frame,
    write_frame_to,
};
use crate::history::read_hst;
use crate::models::{HistoryLog, NumericTable, SnapshotTable};
use crate::tab::read_tab;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Statistics for a directory conversion
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    pub files_converted: usize,
    pub files_failed: usize,
    pub records_written: usize,
    pub processing_time: Duration,
    pub failures: Vec<(PathBuf, String)>,
}

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    match &args.command {
        Commands::Tab(file) => run_tab(file),
        Commands::Hst(hst) => run_hst(hst),
        Commands::Dat(file) => run_dat(file),
        Commands::Convert(convert) => {
            let stats = run_convert(convert, args.show_progress())?;
            generate_conversion_report(&stats);
            if stats.files_failed > 0 {
                anyhow::bail!(
                    "{} of {} files failed to convert",
                    stats.files_failed,
                    stats.files_failed + stats.files_converted
                );
            }
            Ok(())
        }
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("athena_read={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn run_tab(args: &FileArgs) -> Result<()> {
    let table = read_tab(&args.file, &args.read_config())
        .with_context(|| format!("Failed to read snapshot {}", args.file.display()))?;

    match &args.output {
        Some(output) => {
            let mut df = snapshot_to_frame(&args.file, &table)?;
            export(&mut df, output, &args.export_config())
        }
        None => {
            print_snapshot_summary(&args.file, &table);
            Ok(())
        }
    }
}

fn run_hst(args: &HstArgs) -> Result<()> {
    let log = read_hst(&args.file.file, &args.read_config())
        .with_context(|| format!("Failed to read history {}", args.file.file.display()))?;

    match &args.file.output {
        Some(output) => {
            let mut df = history_to_frame(&log)?;
            export(&mut df, output, &args.file.export_config())
        }
        None => {
            print_history_summary(&args.file.file, &log);
            Ok(())
        }
    }
}

fn run_dat(args: &FileArgs) -> Result<()> {
    let table = load_dat(&args.file, &DatOptions::default(), &args.read_config())
        .with_context(|| format!("Failed to read table {}", args.file.display()))?;

    match &args.output {
        Some(output) => {
            let mut df = numeric_to_frame(&table)?;
            export(&mut df, output, &args.export_config())
        }
        None => {
            print_numeric_summary(&args.file, &table);
            Ok(())
        }
    }
}

fn export(df: &mut DataFrame, output: &Path, config: &ExportConfig) -> Result<()> {
    write_frame_to(df, output, config)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "  {} {} rows to {}",
        "Wrote".bright_green(),
        df.height().to_string().bright_white().bold(),
        output.display()
    );
    Ok(())
}

/// Find every `.tab` and `.hst` file under `dir`, sorted by path
pub fn discover_outputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.context("Failed to walk directory")?;
        let is_output = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == TAB_EXTENSION || ext == HST_EXTENSION);
        if entry.file_type().is_file() && is_output {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Convert every output under `args.dir`, continuing past files that fail
pub fn run_convert(args: &ConvertArgs, show_progress: bool) -> Result<ConversionStats> {
    let start_time = Instant::now();
    let files = discover_outputs(&args.dir)?;
    let output_dir = args.output_dir();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    info!("Converting {} files from {}", files.len(), args.dir.display());

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let read_config = args.read_config();
    let export_config = args.export_config();
    let mut stats = ConversionStats::default();

    for file in &files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        progress_bar.set_message(format!("Converting {}", name));

        let destination = export_path(file, &args.dir, &output_dir, export_config.format);
        match convert_file(file, &destination, &read_config, &export_config) {
            Ok(records) => {
                stats.files_converted += 1;
                stats.records_written += records;
                debug!("Converted {} -> {}", file.display(), destination.display());
            }
            Err(e) => {
                error!("Failed to convert {}: {}", file.display(), e);
                stats.files_failed += 1;
                stats.failures.push((file.clone(), e.to_string()));
            }
        }
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message("Conversion complete");
    stats.processing_time = start_time.elapsed();
    Ok(stats)
}

/// Read one output and write it to `destination`; returns the rows written
fn convert_file(
    file: &Path,
    destination: &Path,
    read_config: &ReadConfig,
    export_config: &ExportConfig,
) -> crate::error::Result<usize> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut df = if file.extension().is_some_and(|ext| ext == HST_EXTENSION) {
        history_to_frame(&read_hst(file, read_config)?)?
    } else {
        snapshot_to_frame(file, &read_tab(file, read_config)?)?
    };
    write_frame(&mut df, destination, export_config)?;
    Ok(df.height())
}

fn generate_conversion_report(stats: &ConversionStats) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(stats.processing_time).to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files converted:".bright_cyan(),
        stats.files_converted.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Records written:".bright_cyan(),
        stats.records_written.to_string().bright_white().bold()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
        for (path, reason) in &stats.failures {
            println!("    {} {}", path.display(), reason.bright_black());
        }
    }
}

fn print_snapshot_summary(path: &Path, table: &SnapshotTable) {
    println!("{}", path.display().to_string().bright_green().bold());
    println!("  {} {}", "Time:".bright_cyan(), table.time);
    println!("  {} {}", "Cycle:".bright_cyan(), table.cycle);
    println!(
        "  {} {}..={} ({} cells)",
        "Index range:".bright_cyan(),
        table.index_range.0,
        table.index_range.1,
        table.shape().0
    );
    println!("  {}", "Fields:".bright_cyan());
    for (name, values) in table.fields() {
        print_column(name, values);
    }
}

fn print_history_summary(path: &Path, log: &HistoryLog) {
    println!("{}", path.display().to_string().bright_green().bold());
    println!(
        "  {} {}",
        "Records:".bright_cyan(),
        log.len().to_string().bright_white().bold()
    );
    if let Some(report) = log.consolidation() {
        println!(
            "  {} {} restart branch(es), {} record(s) superseded",
            "Pruned:".bright_cyan(),
            report.branches_removed,
            report.records_dropped
        );
    }
    for warning in log.warnings() {
        println!("  {} {}", "Warning:".bright_yellow(), warning);
    }
    println!("  {}", "Columns:".bright_cyan());
    for (name, values) in log.iter() {
        print_column(name, values);
    }
}

fn print_numeric_summary(path: &Path, table: &NumericTable) {
    let (rows, cols) = table.shape();
    println!("{}", path.display().to_string().bright_green().bold());
    println!("  {} {} x {}", "Shape:".bright_cyan(), rows, cols);
    for c in 0..cols {
        if let Some(values) = table.column(c) {
            print_column(&format!("column_{}", c), &values);
        }
    }
}

fn print_column(name: &str, values: &[f64]) {
    match value_range(values) {
        Some((min, max)) => println!(
            "    {:<16} {} .. {}",
            name.bright_white(),
            format!("{:.6e}", min),
            format!("{:.6e}", max)
        ),
        None => println!("    {:<16} {}", name.bright_white(), "(no values)".bright_black()),
    }
}

/// Minimum and maximum ignoring NaN
fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
