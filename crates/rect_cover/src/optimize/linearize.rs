use std::collections::VecDeque;

use crate::optimize::backend::{LinearConstraint, LinearExpr, MilpBackend, VarId};

/// m = v0 AND v1 for binary variables
///
/// m <= v0, m <= v1, m >= v0 + v1 - 1
pub fn and_pair<B: MilpBackend + ?Sized>(backend: &mut B, v0: VarId, v1: VarId, name: String) -> VarId {
    let m = backend.add_binary(name);
    backend.add_constraint(LinearConstraint::le(LinearExpr::from(m).term(v0, -1), 0));
    backend.add_constraint(LinearConstraint::le(LinearExpr::from(m).term(v1, -1), 0));
    backend.add_constraint(LinearConstraint::ge(
        LinearExpr::from(m).term(v0, -1).term(v1, -1),
        -1,
    ));
    m
}

/// AND of all inputs as a single binary variable
///
/// Pairwise reduction through a FIFO queue: pop two, push their product,
/// until one variable is left. n inputs cost n-1 auxiliaries and 3(n-1)
/// constraints; a single input is returned as is. `None` for no inputs.
pub fn and_linearize<B, I>(backend: &mut B, inputs: I, label: &str) -> Option<VarId>
where
    B: MilpBackend + ?Sized,
    I: IntoIterator<Item = VarId>,
{
    let mut queue: VecDeque<VarId> = inputs.into_iter().collect();
    let mut aux = 0usize;

    while queue.len() > 1 {
        let (Some(v0), Some(v1)) = (queue.pop_front(), queue.pop_front()) else {
            break;
        };
        let m = and_pair(backend, v0, v1, format!("and_{}_{}", label, aux));
        aux += 1;
        queue.push_back(m);
    }

    queue.pop_front()
}
