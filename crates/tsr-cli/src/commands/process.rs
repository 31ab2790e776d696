//! Process command - extract and validate terms from a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use tsr_core::models::config::{StrategyMode, TsrConfig};
use tsr_core::validate::check_consistency;
use tsr_core::{Document, DocumentImage, DocumentKind, ModelContext, SnapshotStore, TermSheetPipeline};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (image, PDF, Word, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use mock values even when a model is configured
    #[arg(long)]
    mock: bool,

    /// Save the result as the current document
    #[arg(long)]
    save: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON snapshot
    Json,
    /// CSV, one row per field
    Csv,
    /// Plain text review summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.mock {
        config.extraction.strategy = StrategyMode::Mock;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting terms...");

    // Model backends block on network I/O.
    let input = args.input.clone();
    let worker_config = config.clone();
    let document = tokio::task::spawn_blocking(move || {
        let mut pipeline = build_pipeline(&worker_config);
        process_file(&mut pipeline, &input, &worker_config)
    })
    .await??;

    pb.finish_and_clear();

    for warning in check_consistency(&document.content) {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_document(&document, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.save {
        let store = SnapshotStore::new(&config.storage.snapshot_dir);
        let path = store.save(&document)?;
        eprintln!("{} Saved as current document ({})", style("✓").green(), path.display());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Build a pipeline with the model backends from `config`.
pub(crate) fn build_pipeline(config: &TsrConfig) -> TermSheetPipeline {
    TermSheetPipeline::new(ModelContext::from_config(&config.models), config)
}

/// Run one file through the pipeline and assemble the reviewed document.
pub(crate) fn process_file(
    pipeline: &mut TermSheetPipeline,
    path: &Path,
    config: &TsrConfig,
) -> anyhow::Result<Document> {
    let Some(kind) = DocumentKind::from_path(path) else {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        anyhow::bail!("Unsupported file format: {}", extension);
    };

    let image = DocumentImage::from_path(path)?;
    let fields = pipeline.process(&image)?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    let mut document = Document::new(name, kind);
    document.content = fields;
    document.refresh(config.validation.validated_threshold);

    Ok(document)
}

pub(crate) fn format_document(document: &Document, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        OutputFormat::Csv => format_csv(document),
        OutputFormat::Text => Ok(format_text(document)),
    }
}

fn format_csv(document: &Document) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["id", "label", "value", "valid"])?;

    for field in &document.content {
        wtr.write_record([
            field.id.as_str(),
            field.label.as_str(),
            field.value.as_str(),
            if field.valid { "true" } else { "false" },
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(document: &Document) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {} ({})\n", document.name, document.kind));
    output.push_str(&format!("Date: {}\n", document.date));
    output.push_str(&format!("Status: {}\n", document.status));
    match document.validation_score {
        Some(score) => output.push_str(&format!("Validation score: {}%\n", score)),
        None => output.push_str("Validation score: n/a\n"),
    }
    output.push('\n');

    let width = document
        .content
        .iter()
        .map(|f| f.label.len())
        .max()
        .unwrap_or(0);

    for field in &document.content {
        let mark = if field.valid { "✓" } else { "✗" };
        output.push_str(&format!(
            "  {} {:<width$}  {}\n",
            mark,
            field.label,
            field.value,
            width = width
        ));
    }

    let invalid = document.invalid_fields().count();
    if invalid > 0 {
        output.push_str(&format!("\n{} field(s) need review\n", invalid));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tsr_core::{DocumentField, DocumentStatus};

    fn document() -> Document {
        Document::new("series-a.pdf", DocumentKind::Pdf).with_fields(vec![
            DocumentField::new("field-1", "Company Name", "Acme, Inc.", true),
            DocumentField::new("field-2", "Closing Date", "soon", false),
        ])
    }

    #[test]
    fn test_format_csv_quotes_values() {
        let csv = format_csv(&document()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,label,value,valid");
        assert_eq!(lines[1], "field-1,Company Name,\"Acme, Inc.\",true");
        assert_eq!(lines[2], "field-2,Closing Date,soon,false");
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&document());
        assert!(text.contains("Status: needs review"));
        assert!(text.contains("Validation score: 50%"));
        assert!(text.contains("✗ Closing Date"));
        assert!(text.contains("1 field(s) need review"));
    }

    #[test]
    fn test_process_file_uses_configured_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("term-sheet.png");
        let mut bytes = Vec::new();
        image::RgbImage::new(8, 4)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        fs::write(&path, bytes).unwrap();

        let mut config = TsrConfig::default();
        config.extraction.strategy = StrategyMode::Mock;
        config.validation.validated_threshold = 101;

        let mut pipeline = build_pipeline(&config);
        let document = process_file(&mut pipeline, &path, &config).unwrap();

        assert_eq!(document.kind, DocumentKind::Image);
        assert_eq!(document.validation_score, Some(100));
        assert_eq!(document.status, DocumentStatus::NeedsReview);
    }
}
