//! Depth-first branch-and-bound over LP relaxations.
//!
//! Each node carries its own variable bounds. A node is pruned when its
//! relaxation is infeasible or its bound cannot beat the incumbent by more
//! than the absolute gap. Branching picks the most fractional integer
//! variable (lowest index on ties) and explores the child on the nearer
//! side first.
//!
//! When a [`PrimalHeuristic`] is supplied, every fractional relaxation is
//! also handed to it, so a checked incumbent usually exists long before the
//! search reaches an integral leaf. A node whose relaxation fails is
//! abandoned; the search goes on and can no longer claim optimality.

mod node;

#[cfg(test)]
mod tests;

use std::fmt;
use std::time::{Duration, Instant};

use icuplan_config::SolverSettings;
use icuplan_milp::{Assignment, Model, Violation};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace, warn};

use crate::adapter::{SolveOptions, SolveOutcome, SolveStatus, SolverAdapter};
use crate::error::SolverError;
use crate::heuristic::PrimalHeuristic;
use crate::scope::SearchScope;
use crate::simplex::{solve_relaxation_with_bounds, LpSolution, LpStatus};
use crate::statistics::StatisticsCollector;
use crate::termination::{
    ExternalTermination, NodeCountTermination, OrTermination, Termination, TimeTermination,
};
use node::Node;

/// Nodes between `progress` events.
const PROGRESS_INTERVAL: u64 = 1_000;

/// Tolerance of the self-check applied to every incumbent.
const CHECK_TOLERANCE: f64 = 1e-6;

/// An improved integer solution, published as soon as it is found.
#[derive(Debug, Clone)]
pub struct Incumbent {
    /// Objective in the model's own sense.
    pub objective: f64,
    pub assignment: Assignment,
    pub node: u64,
    pub elapsed: Duration,
}

/// Reference MILP solver.
///
/// # Example
///
/// ```
/// use icuplan_milp::{ConstraintOp, LinearExpr, Model, ObjectiveSense, VarType};
/// use icuplan_solver::{BranchAndBoundSolver, SolveOptions, SolveStatus, SolverAdapter};
///
/// let mut model = Model::new("tiny");
/// let x = model.add_variable("x", VarType::Integer, 0.0, f64::INFINITY).unwrap();
/// model.add_constraint("cover", LinearExpr::new().term(x, 2.0), ConstraintOp::Ge, 3.0).unwrap();
/// model.set_objective(ObjectiveSense::Minimize, LinearExpr::from(x)).unwrap();
///
/// let outcome = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());
/// assert_eq!(outcome.status, SolveStatus::Optimal);
/// assert_eq!(outcome.assignment.unwrap()[x], 2.0);
/// ```
#[derive(Clone)]
pub struct BranchAndBoundSolver {
    absolute_gap: f64,
    integrality_tolerance: f64,
    node_limit: Option<u64>,
    incumbent_sender: Option<UnboundedSender<Incumbent>>,
    relaxation: RelaxationFn,
}

type RelaxationFn = fn(&Model, &[f64], &[f64]) -> crate::error::Result<LpSolution>;

impl fmt::Debug for BranchAndBoundSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchAndBoundSolver")
            .field("absolute_gap", &self.absolute_gap)
            .field("integrality_tolerance", &self.integrality_tolerance)
            .field("node_limit", &self.node_limit)
            .field("streams_incumbents", &self.incumbent_sender.is_some())
            .finish()
    }
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self::from_settings(&SolverSettings::default())
    }

    /// Takes gap, tolerance and node limit from configuration. The time
    /// limit travels with each call in [`SolveOptions`].
    pub fn from_settings(settings: &SolverSettings) -> Self {
        Self {
            absolute_gap: settings.absolute_gap,
            integrality_tolerance: settings.integrality_tolerance,
            node_limit: settings.node_limit,
            incumbent_sender: None,
            relaxation: solve_relaxation_with_bounds,
        }
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_absolute_gap(mut self, gap: f64) -> Self {
        self.absolute_gap = gap;
        self
    }

    /// Publishes every improved incumbent on `sender`.
    pub fn with_incumbent_sender(mut self, sender: UnboundedSender<Incumbent>) -> Self {
        self.incumbent_sender = Some(sender);
        self
    }

    #[cfg(test)]
    fn with_relaxation(mut self, relaxation: RelaxationFn) -> Self {
        self.relaxation = relaxation;
        self
    }

    fn search(
        &self,
        model: &Model,
        heuristic: Option<&dyn PrimalHeuristic>,
        termination: &impl Termination,
        scope: &mut SearchScope,
    ) -> SearchResult {
        let stats = scope.statistics().clone();
        let mut search = SearchResult::default();
        let mut stack = vec![Node::root(model)];

        while let Some(node) = stack.pop() {
            if termination.is_terminated(scope) {
                search.stopped_early = true;
                break;
            }
            stats.record_node();
            let nodes = stats.node_count();

            if nodes % PROGRESS_INTERVAL == 0 {
                debug!(
                    event = "progress",
                    nodes,
                    open = stack.len(),
                    best = ?search.incumbent.as_ref().map(|(objective, _)| *objective),
                );
            }

            if self.dominated(scope, node.bound) {
                stats.record_pruned();
                continue;
            }

            let relaxation = match (self.relaxation)(model, &node.lower, &node.upper) {
                Ok(relaxation) => relaxation,
                Err(error) => {
                    search.abandon(&stats, nodes, error);
                    continue;
                }
            };
            stats.record_relaxation(relaxation.pivots);
            if relaxation.status == LpStatus::Infeasible {
                trace!(event = "node_infeasible", node = nodes, depth = node.depth);
                stats.record_pruned();
                continue;
            }

            let bound = model.sense().min_sign() * relaxation.objective;
            if self.dominated(scope, bound) {
                trace!(event = "node_pruned", node = nodes, bound = relaxation.objective);
                stats.record_pruned();
                continue;
            }

            let branch = match self.branching_variable(model, &relaxation.values) {
                Some(branch) => {
                    if let Some(heuristic) = heuristic {
                        if let Some(candidate) = heuristic.propose(model, &relaxation.values) {
                            match self.offer(model, candidate, &node, nodes, scope, &mut search) {
                                Ok(Offer::Rejected(violations)) => trace!(
                                    event = "heuristic_rejected",
                                    node = nodes,
                                    violations = violations.len(),
                                ),
                                Ok(_) => {}
                                Err(error) => trace!(
                                    event = "heuristic_rejected",
                                    node = nodes,
                                    error = %error,
                                ),
                            }
                            if self.dominated(scope, bound) {
                                stats.record_pruned();
                                continue;
                            }
                        }
                    }
                    branch
                }
                None => {
                    let assignment = self.rounded(model, &relaxation.values);
                    match self.offer(model, assignment, &node, nodes, scope, &mut search) {
                        Ok(Offer::Rejected(violations)) => {
                            // integral within tolerance, yet rounding breaks a row:
                            // split on the variable furthest from its rounded value
                            match self.repair_branch(model, &relaxation.values, &violations) {
                                Some(branch) => {
                                    debug!(
                                        event = "incumbent_rejected",
                                        node = nodes,
                                        violations = violations.len(),
                                    );
                                    branch
                                }
                                None => {
                                    warn!(
                                        event = "incumbent_rejected",
                                        node = nodes,
                                        violations = violations.len(),
                                    );
                                    continue;
                                }
                            }
                        }
                        Ok(_) => continue,
                        Err(error) => {
                            search.abandon(&stats, nodes, error);
                            continue;
                        }
                    }
                }
            };

            let (index, value) = branch;
            let (down, up) = node.branch(index, value, bound);
            // the child on the nearer side is popped first
            if value - value.floor() <= 0.5 {
                stack.push(up);
                stack.push(down);
            } else {
                stack.push(down);
                stack.push(up);
            }
        }

        search
    }

    /// True when a node with this bound cannot beat the incumbent.
    fn dominated(&self, scope: &SearchScope, bound: f64) -> bool {
        scope
            .best_objective()
            .is_some_and(|best| bound >= best - self.absolute_gap)
    }

    /// Checks `assignment` and installs it when it improves on the incumbent.
    fn offer(
        &self,
        model: &Model,
        assignment: Assignment,
        node: &Node,
        nodes: u64,
        scope: &mut SearchScope,
        search: &mut SearchResult,
    ) -> Result<Offer, SolverError> {
        let violations = model
            .check(&assignment, CHECK_TOLERANCE)
            .map_err(|e| SolverError::Numerical(e.to_string()))?;
        if !violations.is_empty() {
            return Ok(Offer::Rejected(violations));
        }
        let objective = model
            .objective_value(&assignment)
            .map_err(|e| SolverError::Numerical(e.to_string()))?;
        let value = model.sense().min_sign() * objective;
        if scope.best_objective().is_some_and(|best| value >= best) {
            return Ok(Offer::NotBetter);
        }

        scope.set_best_objective(value);
        debug!(
            event = "incumbent",
            node = nodes,
            objective,
            depth = node.depth,
        );
        if let Some(sender) = &self.incumbent_sender {
            let _ = sender.send(Incumbent {
                objective,
                assignment: assignment.clone(),
                node: nodes,
                elapsed: scope.elapsed(),
            });
        }
        search.incumbent = Some((objective, assignment));
        Ok(Offer::Accepted)
    }

    /// Most fractional integer variable, lowest index on ties.
    fn branching_variable(&self, model: &Model, values: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (index, (variable, &value)) in model.variables().iter().zip(values).enumerate() {
            if !variable.is_integral() {
                continue;
            }
            let fraction = (value - value.floor()).min(value.ceil() - value);
            if fraction <= self.integrality_tolerance {
                continue;
            }
            if best.map_or(true, |(_, _, f)| fraction > f) {
                best = Some((index, value, fraction));
            }
        }
        best.map(|(index, value, _)| (index, value))
    }

    /// Integer variable to split on when a rounded, integral-looking
    /// relaxation fails the check. Variables of the violated rows come
    /// first; `None` when every integer variable is exactly integral.
    fn repair_branch(
        &self,
        model: &Model,
        values: &[f64],
        violations: &[Violation],
    ) -> Option<(usize, f64)> {
        let residual = |index: usize| {
            let value = values[index];
            let off = (value - value.round()).abs();
            (model.variables()[index].is_integral() && off > 0.0).then_some(off)
        };
        let widest = |indices: &mut dyn Iterator<Item = usize>| {
            indices
                .filter_map(|index| residual(index).map(|off| (index, off)))
                .fold(None, |best: Option<(usize, f64)>, (index, off)| match best {
                    Some((_, best_off)) if best_off >= off => best,
                    _ => Some((index, off)),
                })
                .map(|(index, _)| (index, values[index]))
        };

        let mut involved = violations.iter().flat_map(|violation| match violation {
            Violation::Row { index, .. } => model.constraints()[*index]
                .expr()
                .terms()
                .map(|(var, _)| var.index())
                .collect::<Vec<_>>(),
            Violation::Bound { var, .. } | Violation::Integrality { var, .. } => {
                vec![var.index()]
            }
        });
        widest(&mut involved).or_else(|| widest(&mut (0..values.len())))
    }

    fn rounded(&self, model: &Model, values: &[f64]) -> Assignment {
        let values = model
            .variables()
            .iter()
            .zip(values)
            .map(|(variable, &value)| {
                if variable.is_integral() {
                    value.round()
                } else {
                    value
                }
            })
            .collect();
        Assignment::new(values)
    }
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new()
    }
}

enum Offer {
    Accepted,
    NotBetter,
    Rejected(Vec<Violation>),
}

#[derive(Default)]
struct SearchResult {
    incumbent: Option<(f64, Assignment)>,
    stopped_early: bool,
    /// First relaxation failure; the failed subtrees were not explored.
    failure: Option<SolverError>,
}

impl SearchResult {
    fn abandon(&mut self, stats: &StatisticsCollector, node: u64, error: SolverError) {
        warn!(event = "node_failed", node, error = %error);
        stats.record_abandoned();
        self.failure.get_or_insert(error);
    }
}

impl SolverAdapter for BranchAndBoundSolver {
    fn solve(&self, model: &Model, options: &SolveOptions) -> SolveOutcome {
        let started = Instant::now();
        info!(
            event = "solve_start",
            variables = model.variable_count(),
            integer_variables = model.integer_variable_count(),
            constraints = model.constraint_count(),
            time_limit_secs = options.time_limit.map(|t| t.as_secs_f64()),
        );

        let termination = OrTermination((
            options.time_limit.map(TimeTermination::new),
            self.node_limit.map(NodeCountTermination::new),
            options.terminate.clone().map(ExternalTermination::new),
        ));
        let mut scope = SearchScope::new();

        let search = self.search(model, options.heuristic.as_deref(), &termination, &mut scope);
        let statistics = scope.statistics().snapshot();

        let outcome = match search {
            SearchResult {
                incumbent: Some((objective, assignment)),
                stopped_early,
                failure,
            } => {
                // an abandoned subtree leaves optimality unproven
                let status = if stopped_early || failure.is_some() {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Optimal
                };
                SolveOutcome::with_solution(status, objective, assignment, statistics)
            }
            SearchResult {
                incumbent: None,
                failure: Some(error),
                ..
            } => SolveOutcome::error(error.to_string(), statistics),
            SearchResult {
                incumbent: None,
                stopped_early,
                failure: None,
            } => {
                let status = if stopped_early {
                    SolveStatus::TimedOut
                } else {
                    SolveStatus::Infeasible
                };
                SolveOutcome::without_solution(status, statistics)
            }
        };

        info!(
            event = "solve_end",
            status = %outcome.status,
            objective = outcome.objective_value,
            nodes = outcome.statistics.nodes,
            pivots = outcome.statistics.pivots,
            incumbents = outcome.statistics.incumbents,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        outcome
    }
}
