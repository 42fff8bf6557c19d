//! Subcommand implementations.

use std::fs;
use std::path::PathBuf;

use icuplan::{FileCatalog, NoForecast, Planner, PlannerConfig, RepairCostMode};

use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use crate::InputArgs;

/// Options of `icuplan solve` beyond the shared input.
#[derive(Debug)]
pub struct SolveArgs {
    pub time_limit: Option<u64>,
    pub node_limit: Option<u64>,
    pub repair_cost: Option<RepairCostMode>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Loads the configuration file, if any, and applies `--demand`.
pub fn load_config(input: &InputArgs) -> CliResult<PlannerConfig> {
    let mut config = match &input.config {
        Some(path) => PlannerConfig::load(path).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?,
        None => PlannerConfig::default(),
    };
    if let Some(demand) = input.demand {
        config = config.with_demand(demand);
    }
    Ok(config)
}

pub fn solve(input: &InputArgs, args: SolveArgs) -> CliResult<()> {
    let mut config = load_config(input)?;
    if let Some(seconds) = args.time_limit {
        config = config.with_time_limit_secs(seconds);
    }
    if let Some(nodes) = args.node_limit {
        if nodes == 0 {
            return Err(CliError::Invalid("--node-limit must be positive".to_string()));
        }
        config = config.with_node_limit(nodes);
    }
    if let Some(mode) = args.repair_cost {
        config = config.with_repair_cost(mode);
    }

    let report = Planner::new(config).plan(&FileCatalog::new(&input.catalog), &NoForecast)?;

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = &args.output {
        fs::write(path, &json).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
    }

    match args.format {
        OutputFormat::Text => {
            println!("{}", output::render_report(&report));
            if let Some(path) = &args.output {
                output::print_success(&format!("plan written to {}", path.display()));
            }
        }
        OutputFormat::Json => println!("{json}"),
    }
    Ok(())
}

pub fn export_lp(
    input: &InputArgs,
    repair_cost: Option<RepairCostMode>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let mut config = load_config(input)?;
    if let Some(mode) = repair_cost {
        config = config.with_repair_cost(mode);
    }

    let planner = Planner::new(config);
    let problem = planner.build_problem(&FileCatalog::new(&input.catalog), &NoForecast)?;
    let formulation = planner.formulate(&problem)?;
    let lp = formulation.to_lp_string();

    match output {
        Some(path) => {
            fs::write(&path, lp).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            let model = formulation.model();
            output::print_success(&format!(
                "wrote {} ({} variables, {} constraints)",
                path.display(),
                model.variable_count(),
                model.constraint_count()
            ));
        }
        None => print!("{lp}"),
    }
    Ok(())
}

pub fn check(input: &InputArgs) -> CliResult<()> {
    let mut config = load_config(input)?;
    let demand_given = config.demand.value.is_some();
    if !demand_given {
        config = config.with_demand(0.0);
    }

    let planner = Planner::new(config);
    let problem = planner.build_problem(&FileCatalog::new(&input.catalog), &NoForecast)?;

    println!("{}", output::render_check(&problem, demand_given));
    Ok(())
}
