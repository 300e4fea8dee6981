//! Employees command - roster listing and onboarding.

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;

use hrpay_core::models::{Employee, NewEmployee};
use hrpay_core::payslip::rules::format_amount;
use hrpay_core::store;

use super::{GlobalOpts, OutputFormat};

/// Arguments for the employees command.
#[derive(Args)]
pub struct EmployeesArgs {
    #[command(subcommand)]
    command: EmployeesCommand,
}

#[derive(Subcommand)]
enum EmployeesCommand {
    /// List employees
    List {
        /// Include inactive employees
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an employee
    Add(AddArgs),

    /// Exclude an employee from future payroll runs
    Deactivate {
        /// Employee code
        code: String,
    },

    /// Include an employee in payroll runs again
    Activate {
        /// Employee code
        code: String,
    },
}

#[derive(Args)]
struct AddArgs {
    /// Given name
    #[arg(long)]
    first_name: String,

    /// Family name
    #[arg(long, default_value = "")]
    last_name: String,

    /// Monthly base salary (default from configuration)
    #[arg(long)]
    salary: Option<Decimal>,

    /// Employee code (default: next free E### code)
    #[arg(long)]
    code: Option<String>,
}

pub fn run(args: EmployeesArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    match args.command {
        EmployeesCommand::List { all, format } => list(globals, all, format),
        EmployeesCommand::Add(add_args) => add(globals, add_args),
        EmployeesCommand::Deactivate { code } => set_active(globals, &code, false),
        EmployeesCommand::Activate { code } => set_active(globals, &code, true),
    }
}

fn list(globals: &GlobalOpts, all: bool, format: OutputFormat) -> anyhow::Result<()> {
    let ctx = globals.open_context()?;
    let employees = store::list_employees(ctx.db().conn(), !all)?;

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&employees)?,
        OutputFormat::Csv => format_csv(&employees)?,
        OutputFormat::Text => format_text(&employees),
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn add(globals: &GlobalOpts, args: AddArgs) -> anyhow::Result<()> {
    let ctx = globals.open_context()?;
    let conn = ctx.db().conn();

    let code = match args.code {
        Some(code) => {
            if store::find_employee_by_code(conn, &code)?.is_some() {
                anyhow::bail!("Employee code {} is already taken", code);
            }
            code
        }
        None => store::next_employee_code(conn)?,
    };

    let employee = store::insert_employee(
        conn,
        &NewEmployee {
            code,
            first_name: args.first_name.trim().to_string(),
            last_name: args.last_name.trim().to_string(),
            base_salary: args
                .salary
                .unwrap_or(ctx.config().payroll.default_base_salary),
        },
    )?;

    println!(
        "{} Added {} ({}) with base salary {}",
        style("✓").green(),
        employee.full_name(),
        employee.code,
        format_amount(employee.base_salary)
    );
    Ok(())
}

fn set_active(globals: &GlobalOpts, code: &str, active: bool) -> anyhow::Result<()> {
    let ctx = globals.open_context()?;
    store::set_employee_active(ctx.db().conn(), code, active)?;

    let state = if active { "active" } else { "inactive" };
    println!("{} {} is now {}", style("✓").green(), code, state);
    Ok(())
}

fn format_csv(employees: &[Employee]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["id", "code", "first_name", "last_name", "base_salary", "active"])?;

    for e in employees {
        wtr.write_record([
            &e.id.to_string(),
            &e.code,
            &e.first_name,
            &e.last_name,
            &e.base_salary.to_string(),
            &e.active.to_string(),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<6} {:<28} {:>14}  {}\n",
        "CODE", "NAME", "BASE SALARY", "STATUS"
    ));
    for e in employees {
        output.push_str(&format!(
            "{:<6} {:<28} {:>14}  {}\n",
            e.code,
            e.full_name(),
            format_amount(e.base_salary),
            if e.active { "active" } else { "inactive" }
        ));
    }
    output.push_str(&format!("\n{} employees\n", employees.len()));
    output
}
