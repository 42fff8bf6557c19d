//! Sparse linear expressions.

use std::ops::AddAssign;

use smallvec::SmallVec;

use crate::assignment::Assignment;
use crate::variable::VarId;

/// `sum(coefficient * variable) + constant`.
///
/// Terms are kept in insertion order; repeated variables are allowed and
/// summed on evaluation. Most rows of a capacity model touch a handful of
/// variables, so terms live inline until they spill.
///
/// # Examples
///
/// ```
/// use icuplan_milp::{LinearExpr, Model, VarType};
///
/// let mut model = Model::new("demo");
/// let x = model.add_variable("x", VarType::Integer, 0.0, 10.0).unwrap();
/// let y = model.add_variable("y", VarType::Integer, 0.0, 10.0).unwrap();
///
/// let expr = LinearExpr::new().term(x, 2.0).term(y, -1.0).constant(3.0);
/// assert_eq!(expr.len(), 2);
/// assert_eq!(expr.constant_value(), 3.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: SmallVec<[(VarId, f64); 4]>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Builder form of [`add_constant`](Self::add_constant).
    pub fn constant(mut self, value: f64) -> Self {
        self.add_constant(value);
        self
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().copied()
    }

    pub fn constant_value(&self) -> f64 {
        self.constant
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression against a dense value slice.
    ///
    /// Panics if a term indexes past `values`; models validate their
    /// expressions on insertion so this only happens with foreign slices.
    pub fn evaluate_slice(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(var, coef)| acc + coef * values[var.index()])
    }

    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        self.evaluate_slice(assignment.values())
    }

    /// Moves the constant out, returning it. Used when a constraint folds
    /// the constant into its right-hand side.
    pub(crate) fn take_constant(&mut self) -> f64 {
        std::mem::take(&mut self.constant)
    }
}

impl AddAssign<(VarId, f64)> for LinearExpr {
    fn add_assign(&mut self, (var, coefficient): (VarId, f64)) {
        self.add_term(var, coefficient);
    }
}

impl AddAssign<f64> for LinearExpr {
    fn add_assign(&mut self, value: f64) {
        self.add_constant(value);
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::new().term(var, 1.0)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        LinearExpr {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

impl Extend<(VarId, f64)> for LinearExpr {
    fn extend<I: IntoIterator<Item = (VarId, f64)>>(&mut self, iter: I) {
        self.terms.extend(iter);
    }
}
