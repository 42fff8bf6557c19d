//! Output formatting utilities

use std::fmt::Write;

use icuplan::{FacilityActions, PlanReport, Problem, SolveStatus};
use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;

/// Output format for `icuplan solve`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored plan summary
    #[default]
    Text,
    /// The full plan report as JSON
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".bright_red().bold(), message);
}

fn units(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Money with thousands separators and two decimals.
pub fn cost(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, units(cents / 100), cents % 100)
}

pub fn render_report(report: &PlanReport) -> String {
    let plan = &report.plan;
    let mut out = String::new();

    let status = match report.status {
        SolveStatus::Optimal => "OPTIMAL".bright_green().bold().to_string(),
        other => other.to_string().to_uppercase().yellow().bold().to_string(),
    };
    let _ = writeln!(
        out,
        "{} │ total cost {}",
        status,
        cost(plan.objective_value).bright_white().bold()
    );
    if !report.optimal {
        let _ = writeln!(
            out,
            "{}",
            "search stopped at a limit; a cheaper plan may exist".yellow()
        );
    }

    for actions in &plan.facilities {
        out.push('\n');
        render_facility(&mut out, actions);
    }

    let summary = &plan.summary;
    let _ = write!(
        out,
        "\n{} facilities served │ {} newly built │ {} beds │ {} added",
        units(summary.facilities_served as u64).bright_yellow(),
        units(summary.facilities_built as u64).bright_yellow(),
        units(summary.beds_total).bright_yellow(),
        units(summary.added_beds_total).bright_green(),
    );
    out
}

fn render_facility(out: &mut String, actions: &FacilityActions) {
    let label = match &actions.name {
        Some(name) => format!("{} ({})", actions.facility, name),
        None => actions.facility.to_string(),
    };
    let _ = write!(
        out,
        "{} {}  {} beds (+{})",
        "●".bright_blue(),
        label.bold(),
        units(actions.beds),
        units(actions.added_beds),
    );
    if actions.newly_built {
        let _ = write!(
            out,
            "  {} {}",
            "build".bright_magenta(),
            cost(actions.construction_cost)
        );
    }
    out.push('\n');

    for item in &actions.acquire {
        let _ = writeln!(
            out,
            "    {:<9}{} × {}",
            "acquire".cyan(),
            item.requirement,
            units(item.quantity)
        );
    }
    for item in &actions.repair {
        let _ = writeln!(
            out,
            "    {:<9}{} × {}",
            "repair".cyan(),
            item.requirement,
            units(item.quantity)
        );
    }
    for shipment in &actions.transfer_out {
        let _ = writeln!(
            out,
            "    {:<9}{} × {} → {}",
            "send".cyan(),
            shipment.requirement,
            units(shipment.quantity),
            shipment.counterpart
        );
    }
    for shipment in &actions.transfer_in {
        let _ = writeln!(
            out,
            "    {:<9}{} × {} ← {}",
            "receive".cyan(),
            shipment.requirement,
            units(shipment.quantity),
            shipment.counterpart
        );
    }
}

pub fn render_check(problem: &Problem, demand_given: bool) -> String {
    let mut out = String::new();
    let built = problem.built_facilities().count();
    let _ = writeln!(
        out,
        "{} catalog is valid",
        "✓".bright_green().bold()
    );
    let _ = writeln!(
        out,
        "  facilities    {} ({} built)",
        units(problem.facility_count() as u64),
        units(built as u64)
    );
    let _ = writeln!(
        out,
        "  requirements  {} ({} repairable)",
        units(problem.requirement_count() as u64),
        units(problem.repairable_count() as u64)
    );

    let in_service: f64 = problem
        .built_facilities()
        .map(|f| problem.beds_in_service(f).min(f64::from(problem.facility(f).upper_beds)))
        .sum();
    let capacity = problem.total_bed_capacity();
    let _ = writeln!(out, "  beds now      {:.1}", in_service);
    let _ = write!(out, "  bed ceiling   {}", units(capacity));

    if demand_given {
        let demand = problem.demand();
        let _ = write!(out, "\n  demand        {}", demand);
        if demand > capacity as f64 {
            let _ = write!(
                out,
                "\n{} demand exceeds every bed ceiling combined; solving will report infeasible",
                "⚠".yellow().bold()
            );
        }
    }
    out
}
