//! Payslip command - parse or import a single payslip document.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use hrpay_core::ingest::{PayslipImport, SourceDocument};
use hrpay_core::models::ParsedPayslip;
use hrpay_core::payslip::rules::format_amount;
use hrpay_core::{PayslipParser, RulePayslipParser};

use super::{emit, load_document, GlobalOpts, OutputFormat};

/// Arguments for the payslip command.
#[derive(Args)]
pub struct PayslipArgs {
    #[command(subcommand)]
    command: PayslipCommand,
}

#[derive(Subcommand)]
enum PayslipCommand {
    /// Extract payslip fields and print them
    Parse(ParseArgs),

    /// Parse a payslip and store it in the imported run for its period
    Import(ImportArgs),
}

#[derive(Args)]
struct ParseArgs {
    /// Input file (PDF or text dump)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include the extracted text in JSON output
    #[arg(long)]
    raw_text: bool,
}

#[derive(Args)]
struct ImportArgs {
    /// Input file (PDF or text dump)
    input: PathBuf,

    /// Employee code to book the payslip to, bypassing name matching
    #[arg(long)]
    assign: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: PayslipArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    match args.command {
        PayslipCommand::Parse(parse_args) => parse(parse_args),
        PayslipCommand::Import(import_args) => import(import_args, globals),
    }
}

fn parse(args: ParseArgs) -> anyhow::Result<()> {
    let document = load_document(&args.input)?;
    let parsed = RulePayslipParser::new()
        .with_raw_text(args.raw_text)
        .parse(&document.text.text());

    let missing = parsed.missing_fields();
    if !missing.is_empty() {
        eprintln!(
            "{} Fields not found: {}",
            style("⚠").yellow(),
            missing.join(", ")
        );
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&parsed)?,
        OutputFormat::Csv => format_csv(&parsed)?,
        OutputFormat::Text => format_text(&parsed),
    };
    emit(args.output.as_deref(), output.trim_end())
}

fn import(args: ImportArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    let mut ctx = globals.open_context()?;

    let document = load_document(&args.input)?;
    let parsed = RulePayslipParser::new()
        .with_raw_text(false)
        .parse(&document.text.text());

    info!("Importing {}", args.input.display());
    let import = ctx.import_payslip(
        &parsed,
        Some(SourceDocument {
            bytes: &document.bytes,
            extension: &document.extension,
        }),
        args.assign.as_deref(),
    )?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&import)?),
        OutputFormat::Csv | OutputFormat::Text => print_import(&import),
    }
    Ok(())
}

pub(crate) fn print_import(import: &PayslipImport) {
    let how = match (import.match_type, import.created) {
        (_, true) => "new employee".to_string(),
        (Some(match_type), false) => format!("{} match, score {:.4}", match_type.as_str(), import.score),
        (None, false) => "assigned".to_string(),
    };

    println!(
        "{} Imported {:02}/{} payslip for {} ({}) [{}]",
        style("✓").green(),
        import.month,
        import.year,
        import.employee_name,
        import.code,
        how
    );
    println!(
        "   Gross {}  Deductions {}  Net {}",
        format_amount(import.gross),
        format_amount(import.deductions),
        format_amount(import.net)
    );
}

const FIELDS: [&str; 14] = [
    "name", "month", "year", "gross", "basic", "hra", "pf_ee", "pf_er", "esi_ee", "esi_er",
    "lwf_ee", "lwf_er", "admin_pf", "net",
];

fn amounts(parsed: &ParsedPayslip) -> [Option<Decimal>; 11] {
    [
        parsed.gross,
        parsed.basic,
        parsed.hra,
        parsed.pf_ee,
        parsed.pf_er,
        parsed.esi_ee,
        parsed.esi_er,
        parsed.lwf_ee,
        parsed.lwf_er,
        parsed.admin_pf,
        parsed.net,
    ]
}

fn format_csv(parsed: &ParsedPayslip) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(FIELDS)?;

    let mut record = vec![
        parsed.name.clone().unwrap_or_default(),
        parsed.month.map(|m| m.to_string()).unwrap_or_default(),
        parsed.year.map(|y| y.to_string()).unwrap_or_default(),
    ];
    record.extend(
        amounts(parsed)
            .iter()
            .map(|a| a.map(|v| v.to_string()).unwrap_or_default()),
    );
    wtr.write_record(&record)?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(parsed: &ParsedPayslip) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Employee: {}\n",
        parsed.name.as_deref().unwrap_or("-")
    ));
    match (parsed.month, parsed.year) {
        (Some(month), Some(year)) => output.push_str(&format!("Period: {:02}/{}\n", month, year)),
        _ => output.push_str("Period: -\n"),
    }
    output.push('\n');

    for (label, amount) in FIELDS[3..].iter().zip(amounts(parsed)) {
        let value = amount.map(format_amount).unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("  {:<10} {:>14}\n", label, value));
    }

    output
}
