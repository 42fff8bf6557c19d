//! icuplan CLI - plan ICU capacity expansion from the command line
//!
//! - `solve` runs the full pipeline and prints the plan
//! - `export-lp` writes the model in CPLEX LP format for external solvers
//! - `check` validates a catalog without solving

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use icuplan::RepairCostMode;

mod commands;
mod error;
mod output;


use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "icuplan")]
#[command(about = "Minimum-cost ICU capacity expansion planner", long_about = None)]
#[command(version)]
struct Cli {
    /// Suppress the banner and progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve for a minimum-cost plan
    Solve {
        #[command(flatten)]
        input: InputArgs,

        /// Wall-clock limit in seconds, 0 for none
        #[arg(long)]
        time_limit: Option<u64>,

        /// Maximum number of branch-and-bound nodes
        #[arg(long)]
        node_limit: Option<u64>,

        /// How repairs are priced in the objective
        #[arg(long, value_enum)]
        repair_cost: Option<RepairCostArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write the JSON plan to this file as well
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the model in CPLEX LP format
    #[command(name = "export-lp")]
    ExportLp {
        #[command(flatten)]
        input: InputArgs,

        /// How repairs are priced in the objective
        #[arg(long, value_enum)]
        repair_cost: Option<RepairCostArg>,

        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a catalog and report its capacity
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Where the problem data comes from.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Catalog file (.toml, .yaml, .yml or .json)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Planner configuration file (.toml, .yaml or .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// ICU beds to provide; overrides the configured demand
    #[arg(short, long)]
    demand: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum RepairCostArg {
    /// Each repaired unit costs the item's repair cost
    PerUnitCost,
    /// Each repaired unit costs the number of broken units
    UnitsNeedingRepair,
}

impl From<RepairCostArg> for RepairCostMode {
    fn from(arg: RepairCostArg) -> Self {
        match arg {
            RepairCostArg::PerUnitCost => RepairCostMode::PerUnitCost,
            RepairCostArg::UnitsNeedingRepair => RepairCostMode::UnitsNeedingRepair,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let interactive = match &cli.command {
        Commands::Solve { format, .. } => *format == OutputFormat::Text,
        Commands::ExportLp { output, .. } => output.is_some(),
        Commands::Check { .. } => true,
    };
    if interactive && !cli.quiet {
        icuplan::console::init();
    }

    let result = match cli.command {
        Commands::Solve {
            input,
            time_limit,
            node_limit,
            repair_cost,
            format,
            output,
        } => commands::solve(
            &input,
            commands::SolveArgs {
                time_limit,
                node_limit,
                repair_cost: repair_cost.map(Into::into),
                format,
                output,
            },
        ),
        Commands::ExportLp {
            input,
            repair_cost,
            output,
        } => commands::export_lp(&input, repair_cost.map(Into::into), output),
        Commands::Check { input } => commands::check(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err.to_string());
            err.exit_code()
        }
    }
}
