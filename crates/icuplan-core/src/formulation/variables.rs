//! Decision variable handles indexed by the problem's dense indices.

use icuplan_milp::{Model, ModelError, VarId, VarType};

use crate::problem::Problem;

/// Handles of every decision variable in a [`Formulation`](super::Formulation).
#[derive(Debug, Clone)]
pub struct Variables {
    facilities: usize,
    requirements: usize,
    repairable: usize,
    beds: Vec<VarId>,
    operating: Vec<VarId>,
    /// `[f * requirements + r]`
    acquire: Vec<VarId>,
    /// `[f * repairable + r]`
    repair: Vec<VarId>,
    /// `[(r * facilities + from) * facilities + to]`, `None` on the diagonal.
    transfer: Vec<Option<VarId>>,
}

impl Variables {
    pub(crate) fn declare(model: &mut Model, problem: &Problem) -> Result<Self, ModelError> {
        let facilities = problem.facility_count();
        let requirements = problem.requirement_count();
        let repairable = problem.repairable_count();
        let unbounded = f64::INFINITY;

        let mut beds = Vec::with_capacity(facilities);
        for f in 0..facilities {
            let name = format!("beds({})", problem.facility_id(f));
            beds.push(model.add_variable(name, VarType::Integer, 0.0, unbounded)?);
        }

        let mut operating = Vec::with_capacity(facilities);
        for f in 0..facilities {
            let name = format!("operating({})", problem.facility_id(f));
            operating.push(model.add_variable(name, VarType::Binary, 0.0, 1.0)?);
        }

        let mut acquire = Vec::with_capacity(facilities * requirements);
        for f in 0..facilities {
            for r in 0..requirements {
                let name = format!(
                    "acquire({},{})",
                    problem.facility_id(f),
                    problem.requirement_key(r)
                );
                acquire.push(model.add_variable(name, VarType::Integer, 0.0, unbounded)?);
            }
        }

        let mut repair = Vec::with_capacity(facilities * repairable);
        for f in 0..facilities {
            for r in 0..repairable {
                let name = format!(
                    "repair({},{})",
                    problem.facility_id(f),
                    problem.requirement_key(r)
                );
                repair.push(model.add_variable(name, VarType::Integer, 0.0, unbounded)?);
            }
        }

        let mut transfer = Vec::with_capacity(requirements * facilities * facilities);
        for r in 0..requirements {
            for from in 0..facilities {
                for to in 0..facilities {
                    if from == to {
                        transfer.push(None);
                        continue;
                    }
                    let name = format!(
                        "transfer({},{},{})",
                        problem.requirement_key(r),
                        problem.facility_id(from),
                        problem.facility_id(to)
                    );
                    transfer.push(Some(model.add_variable(
                        name,
                        VarType::Integer,
                        0.0,
                        unbounded,
                    )?));
                }
            }
        }

        Ok(Self {
            facilities,
            requirements,
            repairable,
            beds,
            operating,
            acquire,
            repair,
            transfer,
        })
    }

    pub fn beds(&self, f: usize) -> VarId {
        self.beds[f]
    }

    pub fn operating(&self, f: usize) -> VarId {
        self.operating[f]
    }

    pub fn acquire(&self, f: usize, r: usize) -> VarId {
        self.acquire[f * self.requirements + r]
    }

    /// `None` when `r` is not repairable.
    pub fn repair(&self, f: usize, r: usize) -> Option<VarId> {
        (r < self.repairable).then(|| self.repair[f * self.repairable + r])
    }

    /// `None` when `from == to`.
    pub fn transfer(&self, r: usize, from: usize, to: usize) -> Option<VarId> {
        self.transfer[(r * self.facilities + from) * self.facilities + to]
    }

    pub fn facility_count(&self) -> usize {
        self.facilities
    }

    pub fn requirement_count(&self) -> usize {
        self.requirements
    }
}
