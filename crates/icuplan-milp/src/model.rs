//! The MILP model: variables, constraint rows and a linear objective.

use crate::assignment::Assignment;
use crate::constraint::{Constraint, ConstraintOp};
use crate::error::{ModelError, Result};
use crate::expr::LinearExpr;
use crate::variable::{VarId, VarType, Variable};

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}

impl ObjectiveSense {
    /// Multiplier that turns this objective into a minimization.
    pub fn min_sign(self) -> f64 {
        match self {
            ObjectiveSense::Minimize => 1.0,
            ObjectiveSense::Maximize => -1.0,
        }
    }
}

/// A single reason an assignment is not feasible for a model.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Bound { var: VarId, value: f64 },
    Integrality { var: VarId, value: f64 },
    Row { index: usize, lhs: f64, op: ConstraintOp, rhs: f64 },
}

/// A mixed-integer linear program.
///
/// The model is append-only: once a variable or row is added it keeps its
/// index, so handles held by a formulation stay valid.
///
/// # Examples
///
/// ```
/// use icuplan_milp::{ConstraintOp, LinearExpr, Model, ObjectiveSense, VarType};
///
/// let mut model = Model::new("tiny");
/// let x = model.add_variable("x", VarType::Integer, 0.0, f64::INFINITY).unwrap();
/// model
///     .add_constraint("cover", LinearExpr::from(x), ConstraintOp::Ge, 3.0)
///     .unwrap();
/// model.set_objective(ObjectiveSense::Minimize, LinearExpr::from(x)).unwrap();
///
/// assert_eq!(model.variable_count(), 1);
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
    sense: ObjectiveSense,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a variable and returns its handle.
    ///
    /// Binary variables are clamped to `[0, 1]`. The lower bound must be
    /// finite and not exceed the upper bound.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        var_type: VarType,
        lower: f64,
        upper: f64,
    ) -> Result<VarId> {
        let name = name.into();
        let (lower, upper) = match var_type {
            VarType::Binary => (lower.max(0.0), upper.min(1.0)),
            _ => (lower, upper),
        };
        if !lower.is_finite() || upper.is_nan() || lower > upper {
            return Err(ModelError::InvalidBounds { name, lower, upper });
        }
        let id = VarId::new(self.variables.len());
        self.variables.push(Variable::new(name, var_type, lower, upper));
        Ok(id)
    }

    /// Adds the row `expr op rhs`; any constant in `expr` moves to the
    /// right-hand side. Returns the row index.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        op: ConstraintOp,
        rhs: f64,
    ) -> Result<usize> {
        let name = name.into();
        self.validate_expr(&expr, &name)?;
        if !rhs.is_finite() {
            return Err(ModelError::NonFinite(name));
        }
        self.constraints.push(Constraint::new(name, expr, op, rhs));
        Ok(self.constraints.len() - 1)
    }

    pub fn set_objective(&mut self, sense: ObjectiveSense, expr: LinearExpr) -> Result<()> {
        self.validate_expr(&expr, "objective")?;
        self.sense = sense;
        self.objective = expr;
        Ok(())
    }

    fn validate_expr(&self, expr: &LinearExpr, name: &str) -> Result<()> {
        if !expr.constant_value().is_finite() {
            return Err(ModelError::NonFinite(name.to_string()));
        }
        for (var, coef) in expr.terms() {
            if var.index() >= self.variables.len() {
                return Err(ModelError::UnknownVariable(var));
            }
            if !coef.is_finite() {
                return Err(ModelError::NonFinite(name.to_string()));
            }
        }
        Ok(())
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.index()]
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn integer_variable_count(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integral()).count()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Objective value of `assignment`, constant included.
    pub fn objective_value(&self, assignment: &Assignment) -> Result<f64> {
        self.ensure_len(assignment)?;
        Ok(self.objective.evaluate(assignment))
    }

    /// Lists every bound, integrality and row violation beyond `tolerance`.
    ///
    /// An empty list means the assignment is feasible.
    pub fn check(&self, assignment: &Assignment, tolerance: f64) -> Result<Vec<Violation>> {
        self.ensure_len(assignment)?;
        let values = assignment.values();
        let mut violations = Vec::new();

        for (index, (variable, &value)) in self.variables.iter().zip(values).enumerate() {
            let var = VarId::new(index);
            if value < variable.lower() - tolerance || value > variable.upper() + tolerance {
                violations.push(Violation::Bound { var, value });
            }
            if variable.is_integral() && (value - value.round()).abs() > tolerance {
                violations.push(Violation::Integrality { var, value });
            }
        }

        for (index, row) in self.constraints.iter().enumerate() {
            let lhs = row.expr().evaluate_slice(values);
            if !row.op().holds(lhs, row.rhs(), tolerance) {
                violations.push(Violation::Row {
                    index,
                    lhs,
                    op: row.op(),
                    rhs: row.rhs(),
                });
            }
        }

        Ok(violations)
    }

    fn ensure_len(&self, assignment: &Assignment) -> Result<()> {
        if assignment.len() != self.variables.len() {
            return Err(ModelError::AssignmentLength {
                expected: self.variables.len(),
                found: assignment.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
