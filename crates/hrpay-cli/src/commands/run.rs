//! Run command - compute payroll for one month.

use std::path::PathBuf;

use clap::Args;
use console::style;
use rust_decimal::Decimal;

use hrpay_core::models::PayslipResult;
use hrpay_core::payslip::rules::format_amount;

use super::{emit, GlobalOpts, OutputFormat};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Payroll month (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Payroll year
    #[arg(short, long)]
    year: i32,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: RunArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    let mut ctx = globals.open_context()?;
    let results = ctx.run_payroll(args.month, args.year)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&results)?,
        OutputFormat::Csv => format_csv(&results)?,
        OutputFormat::Text => format_text(&results),
    };

    if args.format == OutputFormat::Text && args.output.is_none() {
        println!(
            "{} Processed {} employees for {:02}/{}",
            style("✓").green(),
            results.len(),
            args.month,
            args.year
        );
        println!();
    }
    emit(args.output.as_deref(), output.trim_end())
}

fn format_csv(results: &[PayslipResult]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["code", "name", "gross", "deductions", "net", "url"])?;
    for result in results {
        wtr.write_record([
            &result.code,
            &result.name,
            &result.gross.to_string(),
            &result.deductions.to_string(),
            &result.net.to_string(),
            &result.url,
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(results: &[PayslipResult]) -> String {
    let mut output = format!(
        "{:<6} {:<28} {:>14} {:>14} {:>14}\n",
        "CODE", "NAME", "GROSS", "DEDUCTIONS", "NET"
    );
    for result in results {
        output.push_str(&format!(
            "{:<6} {:<28} {:>14} {:>14} {:>14}\n",
            result.code,
            result.name,
            format_amount(result.gross),
            format_amount(result.deductions),
            format_amount(result.net)
        ));
    }

    let total: Decimal = results.iter().map(|r| r.net).sum();
    output.push_str(&format!("\nTotal net: {}\n", format_amount(total)));
    output
}
