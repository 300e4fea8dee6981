//! Consolidated command - parse, match and import multi-employee statements.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use tracing::info;

use hrpay_core::models::{ConsolidatedRow, MatchResult};
use hrpay_core::payslip::rules::format_amount;
use hrpay_core::{parse_consolidated, Assignments};

use super::{emit, load_document, GlobalOpts, OutputFormat};

/// Arguments for the consolidated command.
#[derive(Args)]
pub struct ConsolidatedArgs {
    #[command(subcommand)]
    command: ConsolidatedCommand,
}

#[derive(Subcommand)]
enum ConsolidatedCommand {
    /// Extract the statement rows
    Parse(ParseArgs),

    /// Parse the statement and match each row against the roster
    Match(ParseArgs),

    /// Parse, match and store the statement as an imported run
    Import(ImportArgs),
}

#[derive(Args)]
struct ParseArgs {
    /// Statement file (PDF or text dump)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct ImportArgs {
    /// Statement file (PDF or text dump)
    input: PathBuf,

    /// Payroll month (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Payroll year
    #[arg(short, long)]
    year: i32,

    /// Book a statement name to an employee code, as NAME=CODE
    #[arg(short, long = "assign", value_name = "NAME=CODE")]
    assignments: Vec<String>,

    /// Create employees for names that match nobody
    #[arg(long, conflicts_with = "no_create")]
    create_missing: bool,

    /// Leave unmatched names for manual assignment
    #[arg(long)]
    no_create: bool,
}

pub fn run(args: ConsolidatedArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    match args.command {
        ConsolidatedCommand::Parse(parse_args) => parse(parse_args),
        ConsolidatedCommand::Match(match_args) => match_rows(match_args, globals),
        ConsolidatedCommand::Import(import_args) => import(import_args, globals),
    }
}

fn read_rows(input: &std::path::Path) -> anyhow::Result<Vec<ConsolidatedRow>> {
    let document = load_document(input)?;
    let rows = parse_consolidated(&document.text.text());
    if rows.is_empty() {
        anyhow::bail!("No statement rows found in {}", input.display());
    }
    info!("Parsed {} rows from {}", rows.len(), input.display());
    Ok(rows)
}

fn parse(args: ParseArgs) -> anyhow::Result<()> {
    let rows = read_rows(&args.input)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
        OutputFormat::Csv => rows_csv(&rows)?,
        OutputFormat::Text => rows_text(&rows),
    };
    emit(args.output.as_deref(), output.trim_end())
}

fn match_rows(args: ParseArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    let rows = read_rows(&args.input)?;
    let ctx = globals.open_context()?;
    let results = ctx.match_rows(&rows)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&results)?,
        OutputFormat::Csv => matches_csv(&results)?,
        OutputFormat::Text => matches_text(&results),
    };
    emit(args.output.as_deref(), output.trim_end())
}

fn import(args: ImportArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    let rows = read_rows(&args.input)?;
    let assignments = Assignments::parse(&args.assignments)?;

    let mut config = globals.load_config()?;
    if args.create_missing {
        config.ingest.create_missing_employees = true;
    }
    if args.no_create {
        config.ingest.create_missing_employees = false;
    }
    let mut ctx = hrpay_core::PayrollContext::open(config)?;

    let summary = ctx.import_consolidated(&rows, args.month, args.year, &assignments)?;

    println!(
        "{} Imported {} of {} rows for {:02}/{}",
        style("✓").green(),
        summary.rows_imported,
        summary.rows_parsed,
        args.month,
        args.year
    );
    if summary.employees_created > 0 {
        println!(
            "   {} new employees created",
            style(summary.employees_created).cyan()
        );
    }

    if !summary.conflicts.is_empty() {
        println!();
        println!(
            "{} {} rows resolved to an employee already on this statement and were not imported:",
            style("⚠").yellow(),
            summary.conflicts.len()
        );
        for row in &summary.conflicts {
            println!("  - {} ({})", row.name, row.designation);
        }
    }

    if !summary.unmatched.is_empty() {
        println!();
        println!(
            "{} {} rows matched no employee:",
            style("⚠").yellow(),
            summary.unmatched.len()
        );
        for row in &summary.unmatched {
            println!("  - {} ({})", row.name, row.designation);
        }
        println!();
        println!("Assign them with --assign \"NAME=CODE\" and import again.");
    }

    Ok(())
}

fn amount_or_blank(amount: Option<rust_decimal::Decimal>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

fn rows_csv(rows: &[ConsolidatedRow]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["name", "designation", "wage_rate", "net"])?;
    for row in rows {
        wtr.write_record([
            &row.name,
            &row.designation,
            &amount_or_blank(row.wage_rate),
            &amount_or_blank(row.net),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn rows_text(rows: &[ConsolidatedRow]) -> String {
    let mut output = format!("{:<30} {:<16} {:>12} {:>12}\n", "NAME", "DESIGNATION", "RATE", "NET");
    for row in rows {
        output.push_str(&format!(
            "{:<30} {:<16} {:>12} {:>12}\n",
            row.name,
            row.designation,
            row.wage_rate.map(format_amount).unwrap_or_else(|| "-".to_string()),
            row.net.map(format_amount).unwrap_or_else(|| "-".to_string()),
        ));
    }
    output
}

fn matches_csv(results: &[MatchResult]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "name",
        "designation",
        "wage_rate",
        "net",
        "emp_id",
        "emp_name",
        "match_type",
        "score",
    ])?;
    for result in results {
        wtr.write_record([
            &result.name,
            &result.designation,
            &amount_or_blank(result.wage_rate),
            &amount_or_blank(result.net),
            &result.emp_id.map(|id| id.to_string()).unwrap_or_default(),
            &result.emp_name,
            result.match_type.as_str(),
            &format!("{:.4}", result.score),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn matches_text(results: &[MatchResult]) -> String {
    let mut output = String::new();
    for result in results {
        let marker = if result.is_matched() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        let target = if result.is_matched() {
            format!("{} ({}, {:.4})", result.emp_name, result.match_type.as_str(), result.score)
        } else {
            "no match".to_string()
        };
        let flag = if result.ambiguous { " [ambiguous]" } else { "" };
        output.push_str(&format!("{} {:<30} -> {}{}\n", marker, result.name, target, flag));
    }
    output
}
