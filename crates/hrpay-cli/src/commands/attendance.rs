//! Attendance command - import punch logs.

use std::fs::File;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use super::GlobalOpts;

/// Arguments for the attendance command.
#[derive(Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    command: AttendanceCommand,
}

#[derive(Subcommand)]
enum AttendanceCommand {
    /// Import a CSV with columns code, day, punch_in, punch_out, source
    Import {
        /// Attendance CSV file
        input: PathBuf,
    },
}

pub fn run(args: AttendanceArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    match args.command {
        AttendanceCommand::Import { input } => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }

            let mut ctx = globals.open_context()?;
            let summary = ctx.import_attendance(File::open(&input)?)?;

            println!(
                "{} Imported {} rows",
                style("✓").green(),
                summary.inserted
            );
            if summary.skipped > 0 {
                println!(
                    "   {} rows skipped (unknown code or unreadable row)",
                    style(summary.skipped).yellow()
                );
            }
            Ok(())
        }
    }
}
