//! Init command - create the schema and optionally the demo roster.

use clap::Args;
use console::style;

use hrpay_core::store;

use super::GlobalOpts;

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Insert the five demo employees when the roster is empty
    #[arg(long)]
    seed: bool,
}

pub fn run(args: InitArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    let ctx = globals.open_context()?;

    println!(
        "{} Database ready at {}",
        style("✓").green(),
        ctx.config().database.path.display()
    );

    if args.seed {
        let seeded = store::seed_if_empty(ctx.db().conn())?;
        if seeded > 0 {
            println!("{} Seeded {} demo employees", style("✓").green(), seeded);
        } else {
            println!(
                "{} Roster is not empty, skipping demo employees",
                style("ℹ").blue()
            );
        }
    }

    Ok(())
}
