//! Batch command - import many payslip documents in one go.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use hrpay_core::ingest::{PayslipImport, SourceDocument};
use hrpay_core::{PayrollContext, PayslipParser, RulePayslipParser};

use super::{load_document, GlobalOpts};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Directory for the summary CSV (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of importing a single file.
struct ImportOutcome {
    path: PathBuf,
    import: Option<PayslipImport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    let start = Instant::now();

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to import",
        style("ℹ").blue(),
        files.len()
    );

    let mut ctx = globals.open_context()?;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = RulePayslipParser::new().with_raw_text(false);
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = import_single_file(&mut ctx, &parser, &path);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(import) => {
                debug!("Imported {} as {}", path.display(), import.code);
                outcomes.push(ImportOutcome {
                    path,
                    import: Some(import),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to import {}: {}", path.display(), error_msg);
                    outcomes.push(ImportOutcome {
                        path,
                        import: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    progress.abandon();
                    error!("Failed to import {}: {}", path.display(), error_msg);
                    anyhow::bail!("Import of {} failed: {}", path.display(), error_msg);
                }
            }
        }

        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    let successful = outcomes.iter().filter(|o| o.import.is_some()).count();
    let failed: Vec<_> = outcomes.iter().filter(|o| o.error.is_some()).collect();

    if args.summary {
        let summary_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&summary_dir)?;
        let summary_path = summary_dir.join("summary.csv");

        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} imported, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn import_single_file(
    ctx: &mut PayrollContext,
    parser: &RulePayslipParser,
    path: &Path,
) -> anyhow::Result<PayslipImport> {
    let document = load_document(path)?;
    let parsed = parser.parse(&document.text.text());

    let import = ctx.import_payslip(
        &parsed,
        Some(SourceDocument {
            bytes: &document.bytes,
            extension: &document.extension,
        }),
        None,
    )?;
    Ok(import)
}

fn write_summary(path: &Path, outcomes: &[ImportOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "code",
        "employee",
        "match_type",
        "month",
        "year",
        "gross",
        "deductions",
        "net",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(import) = &outcome.import {
            let match_type = match (import.created, import.match_type) {
                (true, _) => "created",
                (false, Some(match_type)) => match_type.as_str(),
                (false, None) => "assigned",
            };
            wtr.write_record([
                filename,
                "success",
                &import.code,
                &import.employee_name,
                match_type,
                &import.month.to_string(),
                &import.year.to_string(),
                &import.gross.to_string(),
                &import.deductions.to_string(),
                &import.net.to_string(),
                &outcome.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &outcome.processing_time_ms.to_string(),
                outcome.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
