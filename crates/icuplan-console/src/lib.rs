//! Colorful console output for planning runs.
//!
//! Provides a custom `tracing` layer that formats problem, model and solver
//! events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (problem built, solve start/end, plan extracted)
//! - **WARN**: Ignored rate overrides and rejected incumbents
//! - **DEBUG**: Search progress and new incumbents
//! - **TRACE**: Individual node outcomes

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing with `icuplan=info` unless
/// `RUST_LOG` says otherwise.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();
        install(LevelDirective::Info);
    });
}

/// Sets up tracing without the banner, for machine-readable runs.
///
/// Only warnings reach the console unless `RUST_LOG` overrides it.
pub fn init_quiet() {
    INIT.get_or_init(|| install(LevelDirective::Warn));
}

#[derive(Clone, Copy)]
enum LevelDirective {
    Info,
    Warn,
}

fn install(level: LevelDirective) {
    let default = match level {
        LevelDirective::Info => "icuplan=info",
        LevelDirective::Warn => "icuplan=warn",
    };
    let mut builder = EnvFilter::builder();
    if let Ok(directive) = default.parse() {
        builder = builder.with_default_directive(directive);
    }
    let filter = builder.from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(PlannerConsoleLayer)
        .try_init();
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ___ ____ _   _       _
|_ _/ ___| | | |_ __ | | __ _ _ __
 | | |   | | | | '_ \| |/ _` | '_ \
 | | |___| |_| | |_) | | (_| | | | |
|___\____|\___/| .__/|_|\__,_|_| |_|
               |_|
"#;

    let version_line = format!("        v{} - ICU Capacity Expansion Planner\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats planner events with colors.
pub struct PlannerConsoleLayer;

impl<S: Subscriber> Layer<S> for PlannerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        // Accept events from icuplan crates
        if !metadata.target().starts_with("icuplan") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    facilities: Option<u64>,
    built: Option<u64>,
    requirements: Option<u64>,
    repairable: Option<u64>,
    demand: Option<f64>,
    variables: Option<u64>,
    integer_variables: Option<u64>,
    constraints: Option<u64>,
    time_limit_secs: Option<f64>,
    nodes: Option<u64>,
    node: Option<u64>,
    open: Option<u64>,
    depth: Option<u64>,
    best: Option<f64>,
    objective: Option<f64>,
    status: Option<String>,
    pivots: Option<u64>,
    incumbents: Option<u64>,
    violations: Option<u64>,
    duration_ms: Option<u64>,
    facilities_served: Option<u64>,
    facilities_built: Option<u64>,
    beds: Option<u64>,
    added_beds: Option<u64>,
    requirement: Option<String>,
    error: Option<String>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "message" => self.message = Some(s),
            "status" => self.status = Some(s.trim_matches('"').to_string()),
            "requirement" => self.requirement = Some(s.trim_matches('"').to_string()),
            "error" => self.error = Some(s.trim_matches('"').to_string()),
            "best" => self.best = parse_optional_f64(&s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "facilities" => self.facilities = Some(value),
            "built" => self.built = Some(value),
            "requirements" => self.requirements = Some(value),
            "repairable" => self.repairable = Some(value),
            "variables" => self.variables = Some(value),
            "integer_variables" => self.integer_variables = Some(value),
            "constraints" => self.constraints = Some(value),
            "nodes" => self.nodes = Some(value),
            "node" => self.node = Some(value),
            "open" => self.open = Some(value),
            "depth" => self.depth = Some(value),
            "pivots" => self.pivots = Some(value),
            "incumbents" => self.incumbents = Some(value),
            "violations" => self.violations = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "facilities_served" => self.facilities_served = Some(value),
            "facilities_built" => self.facilities_built = Some(value),
            "beds" => self.beds = Some(value),
            "added_beds" => self.added_beds = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "demand" => self.demand = Some(value),
            "time_limit_secs" => self.time_limit_secs = Some(value),
            "objective" => self.objective = Some(value),
            "best" => self.best = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "requirement" => self.requirement = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }
}

// `?Option<f64>` fields arrive as "Some(1.5)" or "None".
fn parse_optional_f64(s: &str) -> Option<f64> {
    s.strip_prefix("Some(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s)
        .parse()
        .ok()
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "problem_built" => format_problem_built(v),
        "formulation_built" => format_formulation_built(v),
        "solve_start" => format_solve_start(v),
        "progress" => format_progress(v),
        "incumbent" => format_incumbent(v),
        "solve_end" => format_solve_end(v),
        "plan_extracted" => format_plan_extracted(v),
        "unknown_rate_override" => format_unknown_override(v),
        "incumbent_rejected" => format_incumbent_rejected(v),
        "node_failed" => format_node_failed(v),
        "node_pruned" | "node_infeasible" => format_node(v, event, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_problem_built(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Problem │ {} facilities ({} built) │ {} requirements",
        format_elapsed(),
        "●".bright_blue().bold(),
        count(v.facilities).bright_yellow(),
        count(v.built).white(),
        count(v.requirements).bright_yellow(),
    );

    if let Some(repairable) = v.repairable.filter(|&r| r > 0) {
        output.push_str(&format!(
            " ({} repairable)",
            repairable.to_formatted_string(&Locale::en).white()
        ));
    }

    if let Some(demand) = v.demand {
        output.push_str(&format!(
            " │ demand {} beds",
            format_quantity(demand).bright_yellow()
        ));
    }

    output
}

fn format_formulation_built(v: &EventVisitor) -> String {
    format!(
        "{} {} Model │ {} variables ({} integer) │ {} constraints",
        format_elapsed(),
        "●".bright_blue().bold(),
        count(v.variables).bright_yellow(),
        count(v.integer_variables).white(),
        count(v.constraints).bright_yellow(),
    )
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();

    let mut output = format!(
        "{} {} Solving │ {} variables │ {} integer │ {} constraints",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.variables).bright_yellow(),
        count(v.integer_variables).bright_yellow(),
        count(v.constraints).bright_yellow(),
    );

    if let Some(limit) = v.time_limit_secs {
        output.push_str(&format!(
            " │ {} limit",
            format_duration_ms((limit * 1000.0) as u64).bright_yellow()
        ));
    }

    output
}

fn format_progress(v: &EventVisitor) -> String {
    let best = v
        .best
        .map(format_cost)
        .unwrap_or_else(|| "none".to_string());

    format!(
        "{} {} {:>10} nodes │ {:>8} open │ best {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        count(v.nodes).white(),
        count(v.open).bright_black(),
        best.bright_magenta().bold()
    )
}

fn format_incumbent(v: &EventVisitor) -> String {
    format!(
        "{} {} Incumbent │ node {} │ depth {} │ cost {}",
        format_elapsed(),
        "★".bright_yellow(),
        count(v.node).white(),
        count(v.depth).white(),
        v.objective
            .map(format_cost)
            .unwrap_or_else(|| "N/A".to_string())
            .bright_green()
            .bold()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let objective = v
        .objective
        .map(format_cost)
        .unwrap_or_else(|| "N/A".to_string());
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} Solving complete │ {} │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_status(status),
        objective.white().bold(),
        format_duration_ms(duration).yellow()
    );

    // Summary box
    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let status_text = status_headline(status);
    let inner_width: usize = 58;
    let total_pad = inner_width.saturating_sub(status_text.chars().count());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        colorize_status(status, status_text),
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(
        &"╠══════════════════════════════════════════════════════════╣"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let rows = [
        ("Total Cost:", objective),
        ("Nodes:", count(v.nodes)),
        ("Simplex Pivots:", count(v.pivots)),
        ("Incumbents:", count(v.incumbents)),
        ("Time:", format_duration_ms(duration)),
    ];
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }

    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn format_plan_extracted(v: &EventVisitor) -> String {
    format!(
        "{} {} Plan │ {} facilities served │ {} newly built │ {} beds (+{}) │ cost {}",
        format_elapsed(),
        "✓".bright_green().bold(),
        count(v.facilities_served).bright_yellow(),
        count(v.facilities_built).bright_yellow(),
        count(v.beds).bright_yellow(),
        count(v.added_beds).bright_green(),
        v.objective
            .map(format_cost)
            .unwrap_or_else(|| "N/A".to_string())
            .white()
            .bold()
    )
}

fn format_unknown_override(v: &EventVisitor) -> String {
    format!(
        "{} {} Rate override for {} ignored: not in catalog",
        format_elapsed(),
        "⚠".yellow().bold(),
        v.requirement.as_deref().unwrap_or("?").bright_white()
    )
}

fn format_incumbent_rejected(v: &EventVisitor) -> String {
    format!(
        "{} {} Candidate at node {} rejected │ {} violations",
        format_elapsed(),
        "⚠".yellow().bold(),
        count(v.node).white(),
        count(v.violations).bright_red()
    )
}

fn format_node_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} Node {} abandoned │ {}",
        format_elapsed(),
        "⚠".yellow().bold(),
        count(v.node).white(),
        v.error.as_deref().unwrap_or("relaxation failed").bright_red()
    )
}

fn format_node(v: &EventVisitor, event: &str, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let (icon, outcome) = if event == "node_pruned" {
        ("✂".bright_black().to_string(), "pruned")
    } else {
        ("✗".bright_red().to_string(), "infeasible")
    };

    format!(
        "{} {} Node {:>10} │ {}",
        format_elapsed(),
        icon,
        count(v.node).bright_black(),
        outcome.bright_black()
    )
}

fn status_headline(status: &str) -> &'static str {
    match status {
        "optimal" => "OPTIMAL PLAN FOUND",
        "feasible" => "FEASIBLE PLAN (limit reached)",
        "infeasible" => "INFEASIBLE (demand cannot be met)",
        "timed_out" => "NO PLAN FOUND (limit reached)",
        _ => "SOLVER ERROR",
    }
}

fn colorize_status(status: &str, text: &str) -> String {
    match status {
        "optimal" => text.bright_green().bold().to_string(),
        "feasible" => text.yellow().bold().to_string(),
        _ => text.bright_red().bold().to_string(),
    }
}

fn format_status(status: &str) -> String {
    colorize_status(status, &status.to_uppercase())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Money with thousands separators and two decimals.
fn format_cost(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}{}.{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_formatted_string(&Locale::en)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests;
