//! Linear constraints.

use std::fmt;

use crate::expr::LinearExpr;

/// Comparison operator of a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintOp {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

impl ConstraintOp {
    /// Operator obtained by multiplying both sides by -1.
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }

    /// Returns true if `lhs op rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ConstraintOp::Le => lhs <= rhs + tolerance,
            ConstraintOp::Ge => lhs >= rhs - tolerance,
            ConstraintOp::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintOp::Le => write!(f, "<="),
            ConstraintOp::Ge => write!(f, ">="),
            ConstraintOp::Eq => write!(f, "="),
        }
    }
}

/// A named row `expr op rhs`. The expression never carries a constant;
/// [`Model::add_constraint`](crate::Model::add_constraint) folds it into `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    expr: LinearExpr,
    op: ConstraintOp,
    rhs: f64,
}

impl Constraint {
    pub(crate) fn new(name: String, mut expr: LinearExpr, op: ConstraintOp, rhs: f64) -> Self {
        let constant = expr.take_constant();
        Self {
            name,
            expr,
            op,
            rhs: rhs - constant,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn op(&self) -> ConstraintOp {
        self.op
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}
