//! Search tree nodes.

use icuplan_milp::Model;

/// A subproblem: the model with tightened variable bounds.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub depth: usize,
    /// Parent relaxation objective in minimization form.
    pub bound: f64,
}

impl Node {
    pub fn root(model: &Model) -> Self {
        Self {
            lower: model.variables().iter().map(|v| v.lower()).collect(),
            upper: model.variables().iter().map(|v| v.upper()).collect(),
            depth: 0,
            bound: f64::NEG_INFINITY,
        }
    }

    /// Splits on `var <= floor(value)` and `var >= ceil(value)`.
    pub fn branch(&self, index: usize, value: f64, bound: f64) -> (Node, Node) {
        let mut down = self.child(bound);
        down.upper[index] = value.floor();
        let mut up = self.child(bound);
        up.lower[index] = value.ceil();
        (down, up)
    }

    fn child(&self, bound: f64) -> Node {
        Node {
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            depth: self.depth + 1,
            bound,
        }
    }
}
