use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    default_solver, variable,
};

use crate::error::{CoverError, Result};
use crate::optimize::backend::{
    BackendSolution, LinearConstraint, LinearExpr, MilpBackend, Relation, VarId,
};

/// good_lp implementation of `MilpBackend`
///
/// Variables and constraints are recorded first and handed to good_lp's
/// `default_solver` (microlp / HiGHS / CBC depending on cargo features) only
/// when `solve` is called, so the recorded model can also be inspected or
/// dumped without solving.
#[derive(Debug, Default)]
pub struct GoodLpBackend {
    names: Vec<String>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl GoodLpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable_name(&self, var: VarId) -> &str {
        &self.names[var.index()]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant_value() as f64);
    for &(var, coef) in expr.terms() {
        out += coef as f64 * vars[var.index()];
    }
    out
}

fn to_constraint(c: &LinearConstraint, vars: &[Variable]) -> good_lp::Constraint {
    let lhs = to_expression(&c.expr, vars);
    let rhs = c.rhs as f64;
    match c.relation {
        Relation::Le => lhs.leq(rhs),
        Relation::Ge => lhs.geq(rhs),
        Relation::Eq => lhs.eq(rhs),
    }
}

impl MilpBackend for GoodLpBackend {
    fn add_binary(&mut self, name: String) -> VarId {
        let id = VarId(self.names.len());
        self.names.push(name);
        id
    }

    fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    fn num_variables(&self) -> usize {
        self.names.len()
    }

    fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn solve(self) -> Result<BackendSolution> {
        let mut vars = ProblemVariables::new();
        let lp_vars: Vec<Variable> = self
            .names
            .iter()
            .map(|name| vars.add(variable().binary().name(name.as_str())))
            .collect();

        let objective = to_expression(&self.objective, &lp_vars);
        let mut model = vars.maximise(objective.clone()).using(default_solver);
        for c in &self.constraints {
            model = model.with(to_constraint(c, &lp_vars));
        }

        log::debug!(
            "solving: {} variables, {} constraints",
            lp_vars.len(),
            self.constraints.len()
        );
        let solution = model.solve().map_err(|e| match e {
            ResolutionError::Infeasible => CoverError::Infeasible,
            other => CoverError::Solver(other.to_string()),
        })?;

        Ok(BackendSolution {
            values: lp_vars.iter().map(|&v| solution.value(v)).collect(),
            objective: solution.eval(&objective),
        })
    }
}
