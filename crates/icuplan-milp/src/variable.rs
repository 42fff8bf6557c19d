//! Decision variables.

use std::fmt;

/// Dense handle of a variable inside one [`Model`](crate::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub(crate) const fn new(index: usize) -> Self {
        VarId(index)
    }

    /// Position of the variable in the model's variable list.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Continuous,
    Integer,
    /// Integer restricted to `{0, 1}`.
    Binary,
}

impl VarType {
    #[inline]
    pub fn is_integral(self) -> bool {
        !matches!(self, VarType::Continuous)
    }
}

/// A named variable with bounds.
///
/// The lower bound is always finite; the upper bound may be `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    var_type: VarType,
    lower: f64,
    upper: f64,
}

impl Variable {
    pub(crate) fn new(name: String, var_type: VarType, lower: f64, upper: f64) -> Self {
        Self {
            name,
            var_type,
            lower,
            upper,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn is_integral(&self) -> bool {
        self.var_type.is_integral()
    }
}
