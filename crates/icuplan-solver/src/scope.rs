//! Search-level scope shared with terminations.

use std::sync::Arc;
use std::time::Duration;

use crate::statistics::StatisticsCollector;

/// State of one branch-and-bound search.
#[derive(Debug)]
pub struct SearchScope {
    statistics: Arc<StatisticsCollector>,
    best_objective: Option<f64>,
}

impl SearchScope {
    pub fn new() -> Self {
        Self::with_statistics(Arc::new(StatisticsCollector::new()))
    }

    pub fn with_statistics(statistics: Arc<StatisticsCollector>) -> Self {
        Self {
            statistics,
            best_objective: None,
        }
    }

    pub fn statistics(&self) -> &Arc<StatisticsCollector> {
        &self.statistics
    }

    pub fn elapsed(&self) -> Duration {
        self.statistics.elapsed()
    }

    pub fn node_count(&self) -> u64 {
        self.statistics.node_count()
    }

    /// Objective of the incumbent in minimization form.
    pub fn best_objective(&self) -> Option<f64> {
        self.best_objective
    }

    pub(crate) fn set_best_objective(&mut self, objective: f64) {
        self.best_objective = Some(objective);
        self.statistics.record_incumbent();
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::new()
    }
}
