//! Solved variable values.

use std::ops::Index;

use crate::variable::VarId;

/// One value per model variable, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// All-zero assignment for `len` variables.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn get(&self, var: VarId) -> Option<f64> {
        self.values.get(var.index()).copied()
    }

    pub fn set(&mut self, var: VarId, value: f64) {
        self.values[var.index()] = value;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl Index<VarId> for Assignment {
    type Output = f64;

    fn index(&self, var: VarId) -> &f64 {
        &self.values[var.index()]
    }
}
