//! Per-unit transfer costs between facilities.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Dense `[requirement][from][to]` cost table in merged requirement order.
///
/// Diagonal entries are present but never read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferCostTable {
    costs: Vec<Vec<Vec<f64>>>,
}

impl TransferCostTable {
    pub fn new(costs: Vec<Vec<Vec<f64>>>) -> Self {
        Self { costs }
    }

    /// Same cost for every requirement and every ordered facility pair.
    pub fn uniform(requirements: usize, facilities: usize, cost: f64) -> Self {
        Self {
            costs: vec![vec![vec![cost; facilities]; facilities]; requirements],
        }
    }

    /// Parses the whitespace-separated text layout: for each requirement in
    /// merged order, one line per source facility holding one cost per
    /// destination facility. Blank lines are skipped.
    pub fn parse_text(
        text: &str,
        requirements: usize,
        facilities: usize,
    ) -> Result<Self, DataError> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let mut costs = Vec::with_capacity(requirements);
        for r in 0..requirements {
            let mut block = Vec::with_capacity(facilities);
            for from in 0..facilities {
                let (number, line) = lines.next().ok_or_else(|| {
                    DataError::Parse(format!(
                        "transfer costs end early: missing row {from} of requirement {r}"
                    ))
                })?;
                let row = line
                    .split_whitespace()
                    .map(|token| {
                        token.parse::<f64>().map_err(|_| {
                            DataError::Parse(format!(
                                "line {}: `{token}` is not a number",
                                number + 1
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if row.len() != facilities {
                    return Err(DataError::Parse(format!(
                        "line {}: expected {facilities} costs, found {}",
                        number + 1,
                        row.len()
                    )));
                }
                block.push(row);
            }
            costs.push(block);
        }

        if let Some((number, _)) = lines.next() {
            return Err(DataError::Parse(format!(
                "line {}: unexpected trailing transfer costs",
                number + 1
            )));
        }

        Ok(Self { costs })
    }

    /// `(requirements, facilities, facilities)` as stored; ragged tables
    /// report the first mismatching inner length.
    pub fn shape(&self) -> (usize, usize, usize) {
        let requirements = self.costs.len();
        let rows = self.costs.first().map_or(0, Vec::len);
        let cols = self
            .costs
            .first()
            .and_then(|block| block.first())
            .map_or(0, Vec::len);

        for block in &self.costs {
            if block.len() != rows {
                return (requirements, block.len(), cols);
            }
            for row in block {
                if row.len() != cols {
                    return (requirements, rows, row.len());
                }
            }
        }
        (requirements, rows, cols)
    }

    /// Checks shape against the catalog and that every off-diagonal cost is
    /// a non-negative finite number.
    pub fn validate(&self, requirements: usize, facilities: usize) -> Result<(), DataError> {
        let expected = (requirements, facilities, facilities);
        let found = self.shape();
        // with no requirements there are no blocks to carry the facility count
        let empty = requirements == 0 && self.costs.is_empty();
        if found != expected && !empty {
            return Err(DataError::TransferTableShape { expected, found });
        }

        for (r, block) in self.costs.iter().enumerate() {
            for (from, row) in block.iter().enumerate() {
                for (to, &cost) in row.iter().enumerate() {
                    if from != to && !(cost.is_finite() && cost >= 0.0) {
                        return Err(DataError::NegativeCost {
                            what: format!("transfer cost [{r}][{from}][{to}]"),
                            value: cost,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Cost of moving one unit of requirement `r` from `from` to `to`.
    ///
    /// # Panics
    /// Panics if an index is out of range; call [`validate`](Self::validate) first.
    pub fn cost(&self, r: usize, from: usize, to: usize) -> f64 {
        self.costs[r][from][to]
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
