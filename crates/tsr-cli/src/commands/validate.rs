//! Validate command - edit fields of a saved document and re-validate it.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use tsr_core::snapshot::load_file;
use tsr_core::validate::check_consistency;
use tsr_core::{Document, DocumentField, SnapshotStore};

use super::config::load_config;
use super::process::{build_pipeline, format_document, OutputFormat};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Snapshot file (default: the saved current document)
    snapshot: Option<PathBuf>,

    /// Change a field before validating, by label or id
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    edits: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the re-validated document back
    #[arg(long)]
    save: bool,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = SnapshotStore::new(&config.storage.snapshot_dir);

    let mut document = match &args.snapshot {
        Some(path) => load_file(path)?,
        None => store.load()?.ok_or_else(|| {
            anyhow::anyhow!("No current document. Run 'tsr process <file> --save' first.")
        })?,
    };

    for edit in &args.edits {
        let (key, value) = parse_edit(edit)?;
        document.edit_field(key, value)?;
    }

    let previous = document.content.clone();

    let worker_config = config.clone();
    let fields = document.content.clone();
    let validated = tokio::task::spawn_blocking(move || {
        build_pipeline(&worker_config).validate_terms(&fields)
    })
    .await?;

    document.content = validated;
    document.refresh(config.validation.validated_threshold);

    for line in describe_changes(&previous, &document.content) {
        eprintln!("{}", line);
    }
    for warning in check_consistency(&document.content) {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    println!("{}", format_document(&document, args.format)?);

    if args.save {
        save_document(&document, args.snapshot.as_ref(), &store)?;
    }

    Ok(())
}

fn parse_edit(edit: &str) -> anyhow::Result<(&str, &str)> {
    let (key, value) = edit
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid edit '{}', expected FIELD=VALUE", edit))?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Invalid edit '{}': missing field name", edit);
    }

    Ok((key, value.trim()))
}

/// One line per field whose validity changed.
fn describe_changes(before: &[DocumentField], after: &[DocumentField]) -> Vec<String> {
    before
        .iter()
        .zip(after)
        .filter(|(old, new)| old.valid != new.valid)
        .map(|(_, new)| {
            if new.valid {
                format!("{} {} is now valid", style("✓").green(), new.label)
            } else {
                format!("{} {} is now invalid", style("✗").red(), new.label)
            }
        })
        .collect()
}

fn save_document(
    document: &Document,
    snapshot: Option<&PathBuf>,
    store: &SnapshotStore,
) -> anyhow::Result<()> {
    let path = match snapshot {
        Some(path) => {
            fs::write(path, serde_json::to_string_pretty(document)?)?;
            path.clone()
        }
        None => store.save(document)?,
    };

    eprintln!("{} Saved {}", style("✓").green(), path.display());
    Ok(())
}
