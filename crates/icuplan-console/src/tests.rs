use super::*;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, trace, warn};

/// Runs events through the visitor and formatter instead of stdout.
struct CaptureLayer(Arc<Mutex<Vec<String>>>);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let output = format_event(&visitor, *event.metadata().level());
        if let Ok(mut lines) = self.0.lock() {
            lines.push(output);
        }
    }
}

fn capture(emit: impl FnOnce()) -> Vec<String> {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(lines.clone()));
    tracing::subscriber::with_default(subscriber, emit);
    let captured = lines.lock().unwrap().clone();
    captured
}

#[test]
fn test_format_cost() {
    assert_eq!(format_cost(41048.0), "41,048.00");
    assert_eq!(format_cost(0.5), "0.50");
    assert_eq!(format_cost(-1234.567), "-1,234.57");
    assert_eq!(format_cost(-0.001), "0.00");
    assert_eq!(format_cost(f64::NAN), "N/A");
}

#[test]
fn test_format_quantity() {
    assert_eq!(format_quantity(1200.0), "1,200");
    assert_eq!(format_quantity(12.5), "12.50");
}

#[test]
fn test_format_duration_ms() {
    assert_eq!(format_duration_ms(250), "250ms");
    assert_eq!(format_duration_ms(1500), "1.50s");
    assert_eq!(format_duration_ms(125_000), "2m 5s");
}

#[test]
fn test_parse_optional_f64() {
    assert_eq!(parse_optional_f64("Some(12.5)"), Some(12.5));
    assert_eq!(parse_optional_f64("None"), None);
    assert_eq!(parse_optional_f64("3"), Some(3.0));
}

#[test]
fn test_unknown_event_is_silent() {
    let visitor = EventVisitor {
        event: Some("lp_infeasible".to_string()),
        ..EventVisitor::default()
    };
    assert!(format_event(&visitor, Level::TRACE).is_empty());
    assert!(format_event(&EventVisitor::default(), Level::INFO).is_empty());
}

#[test]
fn test_problem_built_event() {
    let lines = capture(|| {
        info!(
            target: "icuplan_core",
            event = "problem_built",
            facilities = 1200usize,
            built = 2usize,
            requirements = 3usize,
            repairable = 1usize,
            demand = 40.0,
        );
    });

    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(line.contains("Problem"));
    assert!(line.contains("1,200"));
    assert!(line.contains("repairable"));
    assert!(line.contains("demand"));
    assert!(line.contains("40"));
}

#[test]
fn test_solve_end_summary_box() {
    let lines = capture(|| {
        info!(
            target: "icuplan_solver",
            event = "solve_end",
            status = %"optimal",
            objective = Some(41048.0),
            nodes = 17u64,
            pivots = 2048u64,
            incumbents = 2u64,
            duration_ms = 12u64,
        );
    });

    let line = &lines[0];
    assert!(line.contains("OPTIMAL"));
    assert!(line.contains("OPTIMAL PLAN FOUND"));
    assert!(line.contains("41,048.00"));
    assert!(line.contains("2,048"));
    assert!(line.contains("12ms"));
    assert!(line.contains("╚"));
}

#[test]
fn test_solve_end_without_objective() {
    let lines = capture(|| {
        info!(
            target: "icuplan_solver",
            event = "solve_end",
            status = %"infeasible",
            objective = None::<f64>,
            nodes = 1u64,
            pivots = 4u64,
            incumbents = 0u64,
            duration_ms = 1u64,
        );
    });

    let line = &lines[0];
    assert!(line.contains("INFEASIBLE (demand cannot be met)"));
    assert!(line.contains("N/A"));
}

#[test]
fn test_progress_reads_debug_best() {
    let lines = capture(|| {
        debug!(
            target: "icuplan_solver",
            event = "progress",
            nodes = 5000u64,
            open = 12usize,
            best = ?Some(1500.0_f64),
        );
        debug!(
            target: "icuplan_solver",
            event = "progress",
            nodes = 6000u64,
            open = 3usize,
            best = ?None::<f64>,
        );
    });

    assert!(lines[0].contains("5,000"));
    assert!(lines[0].contains("1,500.00"));
    assert!(lines[1].contains("none"));
}

#[test]
fn test_warnings_are_formatted() {
    let lines = capture(|| {
        warn!(
            target: "icuplan_core",
            event = "unknown_rate_override",
            requirement = %"staff.surgeon",
            "rate override ignored: not in catalog"
        );
        warn!(
            target: "icuplan_solver",
            event = "incumbent_rejected",
            node = 9u64,
            violations = 2usize,
        );
    });

    assert!(lines[0].contains("staff.surgeon"));
    assert!(lines[1].contains("rejected"));
}

#[test]
fn test_failed_node_shows_error() {
    let lines = capture(|| {
        warn!(
            target: "icuplan_solver",
            event = "node_failed",
            node = 14u64,
            error = %"pivot limit reached",
        );
    });

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("abandoned"));
    assert!(lines[0].contains("14"));
    assert!(lines[0].contains("pivot limit reached"));
}

#[test]
fn test_node_events_only_at_trace() {
    let lines = capture(|| {
        trace!(target: "icuplan_solver", event = "node_pruned", node = 3u64, bound = 10.0);
        debug!(target: "icuplan_solver", event = "node_pruned", node = 4u64, bound = 10.0);
    });

    assert!(lines[0].contains("pruned"));
    assert!(lines[1].is_empty());
}
