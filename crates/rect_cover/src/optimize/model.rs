use serde::Serialize;
use std::io;

use crate::{
    config::ProblemParams,
    error::Result,
    grid::{CellKind, Coord, Grid},
    optimize::{
        backend::{BackendSolution, LinearConstraint, LinearExpr, MilpBackend, VarId},
        candidates::{Placement, is_valid_placement, placements},
        catalog::rectangle_catalog,
        linearize::and_linearize,
        lp::GoodLpBackend,
    },
};

/// Placement together with its selection variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementVar {
    pub placement: Placement,
    pub var: VarId,
    pub valid: bool, // invalid placements are fixed to 0
}

/// Size of a built model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub shapes: usize,
    pub cell_vars: usize,
    pub placement_vars: usize,
    pub invalid_placements: usize,
    pub aux_vars: usize,
    pub constraints: usize,
}

impl ModelStats {
    pub fn variables(&self) -> usize {
        self.cell_vars + self.placement_vars + self.aux_vars
    }
}

/// Solved sub-grid read back from a model
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedTile {
    pub grid: Grid, // same kinds, `selected` = cell variable set
    pub placements: Vec<Placement>,
    pub score: usize,
}

/// Covering model of one grid, built on top of a `MilpBackend`
#[derive(Debug)]
pub struct CoverModel<B> {
    backend: B,
    grid: Grid,
    cell_vars: Vec<VarId>, // indexed like grid cells
    placements: Vec<PlacementVar>,
    stats: ModelStats,
}

impl<B: MilpBackend> CoverModel<B> {
    /// 被覆モデルの構築
    ///
    /// 決定変数:
    /// - x_{i,j} ∈ {0,1}: セル (i,j) が選択された長方形に覆われている
    /// - R_{w,h,i,j} ∈ {0,1}: 形状 w×h を (i,j) に置く
    /// - and_* ∈ {0,1}: フットプリントの論理積の補助変数
    ///
    /// 制約:
    /// - 不在セル: x = 0
    /// - 無効な配置: R = 0
    /// - 有効な配置: R <= AND(x), x >= R (フットプリント内の各セル)
    /// - 各セル: Σ R <= 1 (非重複), x <= Σ R (被覆の裏付け)
    ///
    /// 目的関数: max Σ x
    pub fn build(grid: &Grid, params: &ProblemParams, mut backend: B) -> Self {
        let width = grid.width();
        let height = grid.height();

        // 1. セル変数
        let mut cell_vars = Vec::with_capacity(grid.len());
        for j in 0..height {
            for i in 0..width {
                let x = backend.add_binary(format!("x_{{{},{}}}", i, j));
                if grid.kind(i, j) == CellKind::Absent {
                    backend.add_constraint(LinearConstraint::eq(x, 0));
                }
                cell_vars.push(x);
            }
        }

        // 2. 形状ごとの配置変数と積の線形化
        let catalog = rectangle_catalog(params);
        let mut covering: Vec<Vec<VarId>> = vec![Vec::new(); grid.len()];
        let mut placement_vars = Vec::new();
        let mut invalid = 0;

        for &shape in &catalog {
            for placement in placements(grid, shape) {
                let label = placement.label();
                let r = backend.add_binary(label.clone());
                let valid = is_valid_placement(grid, &placement, params.min_special);
                placement_vars.push(PlacementVar {
                    placement,
                    var: r,
                    valid,
                });

                if !valid {
                    backend.add_constraint(LinearConstraint::eq(r, 0));
                    invalid += 1;
                    continue;
                }

                let footprint: Vec<Coord> = placement.footprint().collect();
                let inputs = footprint.iter().map(|c| cell_vars[grid.index(c.x, c.y)]);
                if let Some(product) = and_linearize(&mut backend, inputs, &label) {
                    // R <= AND(x)
                    backend.add_constraint(LinearConstraint::le_expr(r, &LinearExpr::from(product)));
                }
                for c in &footprint {
                    let idx = grid.index(c.x, c.y);
                    // x >= R
                    backend.add_constraint(LinearConstraint::le_expr(r, &LinearExpr::from(cell_vars[idx])));
                    covering[idx].push(r);
                }
            }
        }

        // 3. セルごとの非重複・被覆制約
        for (idx, support) in covering.iter().enumerate() {
            let sum: LinearExpr = support.iter().copied().collect();
            if !support.is_empty() {
                backend.add_constraint(LinearConstraint::le(sum.clone(), 1));
            }
            backend.add_constraint(LinearConstraint::le_expr(cell_vars[idx], &sum));
        }

        // 4. 目的関数
        backend.set_objective(cell_vars.iter().copied().collect());

        let stats = ModelStats {
            shapes: catalog.len(),
            cell_vars: cell_vars.len(),
            placement_vars: placement_vars.len(),
            invalid_placements: invalid,
            aux_vars: backend.num_variables() - cell_vars.len() - placement_vars.len(),
            constraints: backend.num_constraints(),
        };
        log::debug!(
            "model {}x{}: {} shapes, {} placements ({} invalid), {} aux, {} variables, {} constraints",
            width,
            height,
            stats.shapes,
            stats.placement_vars,
            stats.invalid_placements,
            stats.aux_vars,
            stats.variables(),
            stats.constraints
        );

        Self {
            backend,
            grid: grid.clone(),
            cell_vars,
            placements: placement_vars,
            stats,
        }
    }

    pub fn stats(&self) -> ModelStats {
        self.stats
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cell_var(&self, x: usize, y: usize) -> VarId {
        self.cell_vars[self.grid.index(x, y)]
    }

    pub fn placements(&self) -> &[PlacementVar] {
        &self.placements
    }

    /// Solved tile from a backend solution; variables above `threshold` count as set
    pub fn read_solution(&self, solution: &BackendSolution, threshold: f64) -> SolvedTile {
        read_solution(&self.grid, &self.cell_vars, &self.placements, solution, threshold)
    }

    pub fn solve(self, threshold: f64) -> Result<SolvedTile> {
        let Self {
            backend,
            grid,
            cell_vars,
            placements,
            ..
        } = self;
        let solution = backend.solve()?;
        Ok(read_solution(&grid, &cell_vars, &placements, &solution, threshold))
    }
}

fn read_solution(
    grid: &Grid,
    cell_vars: &[VarId],
    placements: &[PlacementVar],
    solution: &BackendSolution,
    threshold: f64,
) -> SolvedTile {
    let flags: Vec<bool> = cell_vars
        .iter()
        .map(|&v| solution.is_set(v, threshold))
        .collect();
    let selected = placements
        .iter()
        .filter(|p| p.valid && solution.is_set(p.var, threshold))
        .map(|p| p.placement)
        .collect();

    SolvedTile {
        grid: grid.with_selection(&flags),
        placements: selected,
        score: solution.objective.max(0.0).round() as usize,
    }
}

impl CoverModel<GoodLpBackend> {
    /// One constraint per line, variables by name
    pub fn dump_constraints<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "# {} variables, {} constraints",
            self.backend.num_variables(),
            self.backend.num_constraints()
        )?;
        for c in self.backend.constraints() {
            let line = c.render_with(|v| self.backend.variable_name(v).to_string());
            log::trace!("{}", line);
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse_grid;
    use crate::optimize::backend::Relation;
    use crate::optimize::verify::check_solution;

    fn build(text: &str) -> (CoverModel<GoodLpBackend>, ProblemParams) {
        let loaded = parse_grid(text).unwrap();
        let model = CoverModel::build(&loaded.grid, &loaded.params, GoodLpBackend::new());
        (model, loaded.params)
    }

    #[test]
    fn test_model_stats() {
        // 2x2, all special, min_special 1, max_area 4
        let (model, _) = build("2 2 1 4\n++\n++\n");
        let stats = model.stats();
        assert_eq!(stats.shapes, 8);
        assert_eq!(stats.cell_vars, 4);
        // 1x1: 4, 1x2: 2, 2x1: 2, 2x2: 1
        assert_eq!(stats.placement_vars, 9);
        assert_eq!(stats.invalid_placements, 0);
        // 1x2 / 2x1: 1 each, 2x2: 3
        assert_eq!(stats.aux_vars, 7);
        assert_eq!(stats.variables(), 20);
        // 3*7 linearization + 9 links + 16 inclusion + 4*2 per cell
        assert_eq!(stats.constraints, 54);
        assert_eq!(model.backend().num_variables(), 20);
    }

    #[test]
    fn test_invalid_placements_are_fixed() {
        let (model, _) = build("2 2 1 4\n+-\n#+\n");
        let stats = model.stats();
        assert_eq!(stats.placement_vars, 9);
        // (1,0) 1x1 has no special, the rest touch the absent cell
        assert_eq!(stats.invalid_placements, 5);

        let constraints = model.backend().constraints();
        for p in model.placements().iter().filter(|p| !p.valid) {
            assert!(constraints.iter().any(|c| {
                c.relation == Relation::Eq && c.rhs == 0 && c.expr.terms() == [(p.var, 1)]
            }));
        }

        let absent = model.cell_var(0, 1);
        assert!(constraints.iter().any(|c| {
            c.relation == Relation::Eq && c.rhs == 0 && c.expr.terms() == [(absent, 1)]
        }));
    }

    #[test]
    fn test_line_of_four_special() {
        let (model, params) = build("1 4 2 4\n++++\n");
        let solved = model.solve(0.5).unwrap();
        assert_eq!(solved.score, 4);
        assert_eq!(solved.grid.count_selected(), 4);
        assert!(check_solution(&solved, params.min_special).is_empty());
    }

    #[test]
    fn test_absent_cell_is_avoided() {
        let (model, params) = build("2 2 1 4\n+-\n#+\n");
        let solved = model.solve(0.5).unwrap();
        assert_eq!(solved.score, 3);
        assert!(!solved.grid.cell(0, 1).selected);
        for p in &solved.placements {
            assert!(!p.contains(Coord::new(0, 1)));
        }
        assert!(check_solution(&solved, params.min_special).is_empty());
    }

    #[test]
    fn test_plain_only_grid_scores_zero() {
        let (model, params) = build("1 3 1 3\n---\n");
        assert_eq!(model.stats().invalid_placements, model.stats().placement_vars);
        let solved = model.solve(0.5).unwrap();
        assert_eq!(solved.score, 0);
        assert!(solved.placements.is_empty());
        assert!(check_solution(&solved, params.min_special).is_empty());
    }

    #[test]
    fn test_solution_respects_min_special() {
        let (model, params) = build("3 3 2 9\n+-+\n---\n+-+\n");
        let solved = model.solve(0.5).unwrap();
        // the whole 3x3 square holds all four specials
        assert_eq!(solved.score, 9);
        assert!(check_solution(&solved, params.min_special).is_empty());
    }

    #[test]
    fn test_dump_constraints() {
        let (model, _) = build("1 2 1 2\n++\n");
        let mut out = Vec::new();
        model.dump_constraints(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 1 + model.stats().constraints);
        assert!(text.contains("x_{0,0}"));
        assert!(text.contains("2x1_{0,0}"));
        assert!(text.contains("and_2x1_{0,0}_0"));
    }
}
