//! CLI application for payroll document ingestion and payroll runs.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{
    attendance, batch, config, consolidated, employees, init, payslip, run, summary, GlobalOpts,
};

/// Payroll ingestion - parse payslips and statements, reconcile names, run payroll
#[derive(Parser)]
#[command(name = "hrpay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init(init::InitArgs),

    /// List and manage employees
    Employees(employees::EmployeesArgs),

    /// Parse or import a single payslip
    Payslip(payslip::PayslipArgs),

    /// Import many payslips at once
    Batch(batch::BatchArgs),

    /// Parse, match or import a consolidated statement
    Consolidated(consolidated::ConsolidatedArgs),

    /// Compute payroll for a month
    Run(run::RunArgs),

    /// Import attendance logs
    Attendance(attendance::AttendanceArgs),

    /// Show headcount and disbursement totals
    Summary(summary::SummaryArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let globals = GlobalOpts {
        config: cli.config,
        db: cli.db,
    };

    match cli.command {
        Commands::Init(args) => init::run(args, &globals),
        Commands::Employees(args) => employees::run(args, &globals),
        Commands::Payslip(args) => payslip::run(args, &globals),
        Commands::Batch(args) => batch::run(args, &globals),
        Commands::Consolidated(args) => consolidated::run(args, &globals),
        Commands::Run(args) => run::run(args, &globals),
        Commands::Attendance(args) => attendance::run(args, &globals),
        Commands::Summary(args) => summary::run(args, &globals),
        Commands::Config(args) => config::run(args, &globals),
    }
}
