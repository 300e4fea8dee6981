//! Summary command - headcount and disbursement totals.

use clap::Args;
use serde::Serialize;

use hrpay_core::models::PayrollRun;
use hrpay_core::payslip::rules::format_amount;
use hrpay_core::store::{headcount, list_runs, total_net_disbursed};
use rust_decimal::Decimal;

use super::{GlobalOpts, OutputFormat};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct Dashboard {
    headcount: i64,
    net_disbursed: Decimal,
    runs: Vec<PayrollRun>,
}

pub fn run(args: SummaryArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    let ctx = globals.open_context()?;
    let conn = ctx.db().conn();

    let dashboard = Dashboard {
        headcount: headcount(conn)?,
        net_disbursed: total_net_disbursed(conn)?,
        runs: list_runs(conn)?,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
        OutputFormat::Csv => print!("{}", format_csv(&dashboard)?),
        OutputFormat::Text => print!("{}", format_text(&dashboard)),
    }
    Ok(())
}

fn format_csv(dashboard: &Dashboard) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["month", "year", "status", "processed_on"])?;
    for run in &dashboard.runs {
        wtr.write_record([
            &run.month.to_string(),
            &run.year.to_string(),
            run.status.to_db_str(),
            &run.processed_on.to_rfc3339(),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    output.push_str(&format!("Active employees: {}\n", dashboard.headcount));
    output.push_str(&format!(
        "Net disbursed:    {}\n",
        format_amount(dashboard.net_disbursed)
    ));

    if !dashboard.runs.is_empty() {
        output.push_str("\nRuns:\n");
        for run in &dashboard.runs {
            output.push_str(&format!(
                "  {:02}/{}  {:<10}  {}\n",
                run.month,
                run.year,
                run.status.to_db_str(),
                run.processed_on.format("%Y-%m-%d %H:%M")
            ));
        }
    }
    output
}
