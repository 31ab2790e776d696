//! Batch processing command for multiple term sheets.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use tsr_core::models::config::StrategyMode;
use tsr_core::{Document, DocumentKind};

use super::config::load_config;
use super::process::{build_pipeline, format_document, process_file, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Use mock values even when a model is configured
    #[arg(long)]
    mock: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    document: Option<Document>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.mock {
        config.extraction.strategy = StrategyMode::Mock;
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| DocumentKind::from_path(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // One pipeline for the whole batch so models load once.
    tokio::task::spawn_blocking(move || process_all(&args, files, &config)).await?
}

fn process_all(args: &BatchArgs, files: Vec<PathBuf>, config: &tsr_core::TsrConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut pipeline = build_pipeline(config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_file(&mut pipeline, &path, config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(document) => results.push(ProcessResult {
                path,
                document: Some(document),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        document: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        write_outputs(output_dir, &results, args.format)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_report(&results);
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );

    Ok(())
}

fn write_outputs(output_dir: &Path, results: &[ProcessResult], format: OutputFormat) -> anyhow::Result<()> {
    for result in results {
        let Some(document) = &result.document else {
            continue;
        };

        let output_name = result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));
        fs::write(&output_path, format_document(document, format)?)?;
        debug!("Wrote output to {}", output_path.display());
    }

    Ok(())
}

fn print_report(results: &[ProcessResult]) {
    let successful = results.iter().filter(|r| r.document.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in results {
        if let Some(document) = &result.document {
            let score = document
                .validation_score
                .map(|s| format!("{:>3}%", s))
                .unwrap_or_else(|| " n/a".to_string());
            println!("  {}  {:<13} {}", score, document.status.to_string(), document.name);
        }
    }

    println!();
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "type",
        "validation_score",
        "invalid_fields",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(document) = &result.document {
            let invalid: Vec<&str> = document.invalid_fields().map(|f| f.label.as_str()).collect();
            wtr.write_record([
                filename,
                &document.status.to_string(),
                &document.kind.to_string(),
                &document.validation_score.map(|s| s.to_string()).unwrap_or_default(),
                &invalid.join("; "),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
