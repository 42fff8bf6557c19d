//! Dense simplex tableau.

use icuplan_milp::ConstraintOp;

use super::{StandardRow, EPS};
use crate::error::{Result, SolverError};

/// Consecutive degenerate pivots before the entering rule turns to Bland's.
const DEGENERATE_RUN: u32 = 50;

pub(crate) struct Tableau {
    /// `m` rows of `width + 1` entries; the last entry is the right-hand side.
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    /// Reduced costs; the last entry is minus the objective value.
    reduced: Vec<f64>,
    width: usize,
    artificial_start: usize,
    pivots: u64,
}

impl Tableau {
    pub fn new(structural: usize, rows: &[StandardRow]) -> Self {
        let slacks = rows
            .iter()
            .filter(|r| r.op != ConstraintOp::Eq)
            .count();
        let artificials = rows
            .iter()
            .filter(|r| r.op != ConstraintOp::Le)
            .count();
        let artificial_start = structural + slacks;
        let width = artificial_start + artificials;

        let mut table = Vec::with_capacity(rows.len());
        let mut basis = Vec::with_capacity(rows.len());
        let mut next_slack = structural;
        let mut next_artificial = artificial_start;

        for row in rows {
            let mut entries = vec![0.0; width + 1];
            entries[..structural].copy_from_slice(&row.coefs);
            entries[width] = row.rhs;
            match row.op {
                ConstraintOp::Le => {
                    entries[next_slack] = 1.0;
                    basis.push(next_slack);
                    next_slack += 1;
                }
                ConstraintOp::Ge => {
                    entries[next_slack] = -1.0;
                    next_slack += 1;
                    entries[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
                ConstraintOp::Eq => {
                    entries[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
            }
            table.push(entries);
        }

        Self {
            rows: table,
            basis,
            reduced: vec![0.0; width + 1],
            width,
            artificial_start,
            pivots: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn artificial_start(&self) -> usize {
        self.artificial_start
    }

    pub fn pivots(&self) -> u64 {
        self.pivots
    }

    pub fn objective_value(&self) -> f64 {
        -self.reduced[self.width]
    }

    /// Recomputes the reduced-cost row for `costs` against the current basis.
    pub fn price(&mut self, costs: &[f64]) {
        let width = self.width;
        self.reduced[..width].copy_from_slice(&costs[..width]);
        self.reduced[width] = 0.0;
        for (row, &basic) in self.rows.iter().zip(&self.basis) {
            let cost = costs[basic];
            if cost == 0.0 {
                continue;
            }
            for (r, &a) in self.reduced.iter_mut().zip(row) {
                *r -= cost * a;
            }
        }
    }

    /// Pivots until no column below `enter_limit` has a negative reduced cost.
    ///
    /// The entering column is the most negative reduced cost; after
    /// [`DEGENERATE_RUN`] pivots in a row that leave the objective unchanged
    /// the rule drops to Bland's lowest-index choice until progress resumes.
    pub fn optimize(&mut self, enter_limit: usize, max_pivots: u64) -> Result<()> {
        let mut degenerate = 0;
        loop {
            let entering = if degenerate < DEGENERATE_RUN {
                self.most_negative(enter_limit)
            } else {
                (0..enter_limit).find(|&j| self.reduced[j] < -EPS)
            };
            let Some(column) = entering else {
                return Ok(());
            };

            let mut leaving: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let a = row[column];
                if a <= EPS {
                    continue;
                }
                let ratio = row[self.width] / a;
                leaving = match leaving {
                    None => Some((i, ratio)),
                    Some((best, best_ratio)) => {
                        if ratio < best_ratio - EPS
                            || (ratio <= best_ratio + EPS && self.basis[i] < self.basis[best])
                        {
                            Some((i, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }

            let Some((row, ratio)) = leaving else {
                return Err(SolverError::Unbounded);
            };
            if ratio <= EPS {
                degenerate += 1;
            } else {
                degenerate = 0;
            }
            self.pivot(row, column);
            if self.pivots > max_pivots {
                return Err(SolverError::IterationLimit(max_pivots));
            }
        }
    }

    fn most_negative(&self, enter_limit: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (j, &cost) in self.reduced[..enter_limit].iter().enumerate() {
            if cost < -EPS && best.map_or(true, |(_, lowest)| cost < lowest) {
                best = Some((j, cost));
            }
        }
        best.map(|(j, _)| j)
    }

    /// Replaces basic artificials at zero level by real columns; rows where
    /// no real column is available are linearly dependent and are dropped.
    pub fn drive_out_artificials(&mut self, artificial_start: usize) {
        let mut i = 0;
        while i < self.rows.len() {
            if self.basis[i] < artificial_start {
                i += 1;
                continue;
            }
            match (0..artificial_start).find(|&j| self.rows[i][j].abs() > EPS) {
                Some(column) => {
                    self.pivot(i, column);
                    i += 1;
                }
                None => {
                    self.rows.remove(i);
                    self.basis.remove(i);
                }
            }
        }
    }

    /// Value of every column under the current basis.
    pub fn basic_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.width];
        for (row, &basic) in self.rows.iter().zip(&self.basis) {
            values[basic] = row[self.width];
        }
        values
    }

    fn pivot(&mut self, pivot_row: usize, column: usize) {
        let divisor = self.rows[pivot_row][column];
        for entry in &mut self.rows[pivot_row] {
            *entry /= divisor;
        }
        let normalized = self.rows[pivot_row].clone();

        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }
            eliminate(row, &normalized, column);
        }
        eliminate(&mut self.reduced, &normalized, column);

        self.basis[pivot_row] = column;
        self.pivots += 1;
    }
}

fn eliminate(row: &mut [f64], pivot: &[f64], column: usize) {
    let factor = row[column];
    if factor == 0.0 {
        return;
    }
    for (entry, &p) in row.iter_mut().zip(pivot) {
        *entry -= factor * p;
    }
    row[column] = 0.0;
}
