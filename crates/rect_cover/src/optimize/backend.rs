//! Minimal MILP interface used by the model builder.
//!
//! The builder only ever adds binary variables, linear constraints with small
//! integer coefficients and one maximisation objective. Solver crates are
//! wired in behind `MilpBackend` (see `lp::GoodLpBackend`).

use std::fmt;
use std::ops::AddAssign;

use crate::error::Result;

/// Handle of a binary variable; ids are dense and start at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Σ coef·var + constant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(VarId, i64)>,
    constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, var: VarId, coef: i64) -> Self {
        self.terms.push((var, coef));
        self
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn constant_value(&self) -> i64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value under a 0/1 assignment indexed by VarId
    pub fn eval(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .map(|&(v, c)| if values[v.index()] { c } else { 0 })
            .sum::<i64>()
            + self.constant
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::new().term(var, 1)
    }
}

impl AddAssign<VarId> for LinearExpr {
    fn add_assign(&mut self, var: VarId) {
        self.terms.push((var, 1));
    }
}

impl FromIterator<VarId> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = VarId>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().map(|v| (v, 1)).collect(),
            constant: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

/// expr (<= | >= | ==) rhs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn le(expr: impl Into<LinearExpr>, rhs: i64) -> Self {
        Self {
            expr: expr.into(),
            relation: Relation::Le,
            rhs,
        }
    }

    pub fn ge(expr: impl Into<LinearExpr>, rhs: i64) -> Self {
        Self {
            expr: expr.into(),
            relation: Relation::Ge,
            rhs,
        }
    }

    pub fn eq(expr: impl Into<LinearExpr>, rhs: i64) -> Self {
        Self {
            expr: expr.into(),
            relation: Relation::Eq,
            rhs,
        }
    }

    /// lhs <= rhs as `lhs - rhs <= 0`
    pub fn le_expr(lhs: impl Into<LinearExpr>, rhs: &LinearExpr) -> Self {
        let mut expr = lhs.into();
        for &(v, c) in rhs.terms() {
            expr = expr.term(v, -c);
        }
        let rhs_value = rhs.constant_value() - expr.constant_value();
        expr.constant = 0;
        Self::le(expr, rhs_value)
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let lhs = self.expr.eval(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs,
            Relation::Ge => lhs >= self.rhs,
            Relation::Eq => lhs == self.rhs,
        }
    }
}

impl LinearConstraint {
    /// Human readable form with variables rendered by `name`
    pub fn render_with<F: Fn(VarId) -> String>(&self, name: F) -> String {
        let mut out = String::new();
        if self.expr.terms.is_empty() {
            out.push('0');
        }
        for (k, &(var, coef)) in self.expr.terms.iter().enumerate() {
            let sign = if coef < 0 { "-" } else { "+" };
            let part = match (k, coef.abs()) {
                (0, 1) => format!("{}{}", if coef < 0 { "-" } else { "" }, name(var)),
                (0, _) => format!("{}{}", coef, name(var)),
                (_, 1) => format!(" {} {}", sign, name(var)),
                (_, c) => format!(" {} {}{}", sign, c, name(var)),
            };
            out.push_str(&part);
        }
        if self.expr.constant != 0 {
            out.push_str(&format!(" + {}", self.expr.constant));
        }
        let op = match self.relation {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "==",
        };
        out.push_str(&format!(" {} {}", op, self.rhs));
        out
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|v| format!("v{}", v.0)))
    }
}

/// Values returned by a successful solve
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSolution {
    pub values: Vec<f64>, // indexed by VarId
    pub objective: f64,
}

impl BackendSolution {
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    pub fn is_set(&self, var: VarId, threshold: f64) -> bool {
        self.value(var) > threshold
    }
}

/// Solver seam: variables, constraints, objective, solve.
///
/// `solve` returns `CoverError::Infeasible` when the solver proves
/// infeasibility and `CoverError::Solver` for any other failure.
pub trait MilpBackend {
    fn add_binary(&mut self, name: String) -> VarId;

    fn add_constraint(&mut self, constraint: LinearConstraint);

    fn set_objective(&mut self, objective: LinearExpr);

    fn num_variables(&self) -> usize;

    fn num_constraints(&self) -> usize;

    fn solve(self) -> Result<BackendSolution>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_and_satisfaction() {
        let (a, b, m) = (VarId(0), VarId(1), VarId(2));
        // m >= a + b - 1  <=>  m - a - b >= -1
        let c = LinearConstraint::ge(LinearExpr::from(m).term(a, -1).term(b, -1), -1);
        assert!(c.is_satisfied(&[true, true, true]));
        assert!(!c.is_satisfied(&[true, true, false]));
        assert!(c.is_satisfied(&[false, true, false]));
    }

    #[test]
    fn test_le_expr_moves_terms_left() {
        let x = VarId(0);
        let rhs: LinearExpr = [VarId(1), VarId(2)].into_iter().collect();
        let c = LinearConstraint::le_expr(x, &rhs);
        assert_eq!(c.relation, Relation::Le);
        assert_eq!(c.rhs, 0);
        assert_eq!(c.expr.terms(), &[(x, 1), (VarId(1), -1), (VarId(2), -1)]);
        assert!(c.is_satisfied(&[true, false, true]));
        assert!(!c.is_satisfied(&[true, false, false]));
    }

    #[test]
    fn test_display() {
        let c = LinearConstraint::le(LinearExpr::from(VarId(3)).term(VarId(1), -1), 0);
        assert_eq!(c.to_string(), "v3 - v1 <= 0");
        let sum: LinearExpr = [VarId(0), VarId(2)].into_iter().collect();
        assert_eq!(LinearConstraint::le(sum, 1).to_string(), "v0 + v2 <= 1");
        assert_eq!(LinearConstraint::le(LinearExpr::new(), 1).to_string(), "0 <= 1");
    }
}
