//! CPLEX LP text export.
//!
//! Writes a model in the LP file format understood by HiGHS, CBC, CPLEX
//! and Gurobi, keeping the symbolic variable and row names. Names that
//! collide after sanitizing get a numeric suffix so every column and row
//! stays distinct.

use std::collections::HashSet;
use std::fmt::Write;

use crate::expr::LinearExpr;
use crate::model::{Model, ObjectiveSense};
use crate::variable::VarType;

// LP readers reject lines longer than 255/510 characters.
const TERMS_PER_LINE: usize = 6;

impl Model {
    /// Renders the model in CPLEX LP format.
    pub fn to_lp_string(&self) -> String {
        let columns = unique_names(self.variables().iter().map(|v| v.name()));
        let rows = unique_names(self.constraints().iter().map(|c| c.name()));

        let mut out = String::new();
        let _ = writeln!(out, "\\ Model {}", sanitize(self.name()));
        let _ = writeln!(
            out,
            "{}",
            match self.sense() {
                ObjectiveSense::Minimize => "Minimize",
                ObjectiveSense::Maximize => "Maximize",
            }
        );
        out.push_str(" obj:");
        write_expr(&mut out, &columns, self.objective());
        if self.objective().constant_value() != 0.0 {
            let _ = write!(out, " {}", signed(self.objective().constant_value()));
        }
        out.push('\n');

        out.push_str("Subject To\n");
        for (row, name) in self.constraints().iter().zip(&rows) {
            let _ = write!(out, " {}:", name);
            write_expr(&mut out, &columns, row.expr());
            let _ = writeln!(out, " {} {}", row.op(), number(row.rhs()));
        }

        out.push_str("Bounds\n");
        for (variable, name) in self.variables().iter().zip(&columns) {
            if variable.var_type() == VarType::Binary {
                continue;
            }
            if variable.upper().is_infinite() {
                let _ = writeln!(out, " {} >= {}", name, number(variable.lower()));
            } else {
                let _ = writeln!(
                    out,
                    " {} <= {} <= {}",
                    number(variable.lower()),
                    name,
                    number(variable.upper())
                );
            }
        }

        let general: Vec<&str> = self
            .variables()
            .iter()
            .zip(&columns)
            .filter(|(v, _)| v.var_type() == VarType::Integer)
            .map(|(_, name)| name.as_str())
            .collect();
        if !general.is_empty() {
            out.push_str("General\n");
            write_name_lines(&mut out, &general);
        }

        let binary: Vec<&str> = self
            .variables()
            .iter()
            .zip(&columns)
            .filter(|(v, _)| v.var_type() == VarType::Binary)
            .map(|(_, name)| name.as_str())
            .collect();
        if !binary.is_empty() {
            out.push_str("Binary\n");
            write_name_lines(&mut out, &binary);
        }

        out.push_str("End\n");
        out
    }
}

fn write_expr(out: &mut String, columns: &[String], expr: &LinearExpr) {
    if expr.is_empty() {
        out.push_str(" 0");
        return;
    }
    for (i, (var, coef)) in expr.terms().enumerate() {
        if i > 0 && i % TERMS_PER_LINE == 0 {
            out.push_str("\n   ");
        }
        let _ = write!(out, " {} {}", signed(coef), columns[var.index()]);
    }
}

fn write_name_lines(out: &mut String, names: &[&str]) {
    for chunk in names.chunks(TERMS_PER_LINE) {
        out.push(' ');
        out.push_str(&chunk.join(" "));
        out.push('\n');
    }
}

fn signed(value: f64) -> String {
    if value < 0.0 {
        format!("- {}", number(-value))
    } else {
        format!("+ {}", number(value))
    }
}

fn number(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{}", value)
    }
}

/// Sanitized names, one per input, with no two equal.
///
/// Names that are already valid keep their spelling; a sanitized name that
/// clashes with an earlier one becomes `name_1`, `name_2` and so on.
fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.collect();
    let mut taken = HashSet::with_capacity(names.len());
    let mut assigned: Vec<Option<String>> = names
        .iter()
        .map(|&name| {
            let clean = sanitize(name) == name && taken.insert(name.to_string());
            clean.then(|| name.to_string())
        })
        .collect();

    for (slot, name) in assigned.iter_mut().zip(&names) {
        if slot.is_some() {
            continue;
        }
        let base = sanitize(name);
        let mut candidate = base.clone();
        let mut suffix = 0;
        while !taken.insert(candidate.clone()) {
            suffix += 1;
            candidate = format!("{base}_{suffix}");
        }
        *slot = Some(candidate);
    }

    assigned.into_iter().flatten().collect()
}

/// LP names may not contain whitespace, `:` or operator characters.
pub(crate) fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            ':' | '<' | '>' | '=' | '+' | '-' | '*' | '^' | '[' | ']' => '_',
            c => c,
        })
        .collect()
}
