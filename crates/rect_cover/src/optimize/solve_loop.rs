use serde::Serialize;

use crate::{
    config::{PartitionConfig, ProblemParams, SolverConfig},
    error::{CoverError, Result},
    grid::{Grid, TileSpec, merge, partition},
    optimize::{
        backend::MilpBackend,
        candidates::Placement,
        lp::GoodLpBackend,
        model::{CoverModel, ModelStats},
        verify::check_solution,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TileStatus {
    Solved,
    Infeasible,
    Failed(String),
}

/// Result of one tile of the loop
#[derive(Debug, Clone, Serialize)]
pub struct TileOutcome {
    pub spec: TileSpec,
    pub status: TileStatus,
    pub score: usize,
    pub stats: ModelStats,
    pub violations: Vec<String>,
}

/// Everything the loop produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub tiles: Vec<TileOutcome>,
    pub total_score: usize,
    pub absent_cells: usize,
    pub merged: Grid,
    pub placements: Vec<Placement>, // in whole-grid coordinates
}

impl RunSummary {
    /// Score with the never-coverable cells added back
    pub fn total_with_absent(&self) -> usize {
        self.total_score + self.absent_cells
    }

    pub fn failed_tiles(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.status != TileStatus::Solved)
            .count()
    }
}

/// Solve every tile with the default good_lp backend
pub fn solve_tiles(
    grid: &Grid,
    params: &ProblemParams,
    partition_config: &PartitionConfig,
    solver_config: &SolverConfig,
) -> Result<RunSummary> {
    solve_tiles_with(grid, params, partition_config, solver_config, GoodLpBackend::new)
}

/// 分割したタイルを順番に解いて結合する
///
/// タイル単位の失敗（infeasible / solver error）はログに残して続行し、
/// そのタイルは未選択のまま結合する。分割・結合の不整合は致命的。
pub fn solve_tiles_with<B, F>(
    grid: &Grid,
    params: &ProblemParams,
    partition_config: &PartitionConfig,
    solver_config: &SolverConfig,
    mut make_backend: F,
) -> Result<RunSummary>
where
    B: MilpBackend,
    F: FnMut() -> B,
{
    let tiles = partition(grid, partition_config.num_x, partition_config.num_y)?;
    let n = tiles.len();
    log::info!(
        "=== start solving {}x{} grid in {} tiles ({}x{}) ===",
        grid.width(),
        grid.height(),
        n,
        partition_config.num_x,
        partition_config.num_y
    );

    let mut total_score = 0;
    let mut outcomes = Vec::with_capacity(n);
    let mut solved_grids = Vec::with_capacity(n);
    let mut placements = Vec::new();

    for (k, tile) in tiles.into_iter().enumerate() {
        log::info!("Iteration {} / {}", k + 1, n);

        let model = CoverModel::build(&tile.grid, params, make_backend());
        let stats = model.stats();

        let outcome = match model.solve(solver_config.solution_threshold) {
            Ok(solved) => {
                let violations: Vec<String> = if solver_config.verify {
                    check_solution(&solved, params.min_special)
                        .iter()
                        .map(|v| v.to_string())
                        .collect()
                } else {
                    Vec::new()
                };
                for v in &violations {
                    log::warn!("tile {}: {}", k, v);
                }

                total_score += solved.score;
                let origin = tile.spec.origin;
                placements.extend(
                    solved
                        .placements
                        .iter()
                        .map(|p| Placement::new(p.shape, p.anchor.offset(origin.x, origin.y))),
                );
                solved_grids.push(solved.grid);

                TileOutcome {
                    spec: tile.spec,
                    status: TileStatus::Solved,
                    score: solved.score,
                    stats,
                    violations,
                }
            }
            Err(e) if e.is_tile_local() => {
                log::error!("tile {} skipped: {}", k, e);
                solved_grids.push(tile.grid.cleared());
                let status = match e {
                    CoverError::Infeasible => TileStatus::Infeasible,
                    other => TileStatus::Failed(other.to_string()),
                };
                TileOutcome {
                    spec: tile.spec,
                    status,
                    score: 0,
                    stats,
                    violations: Vec::new(),
                }
            }
            Err(e) => return Err(e),
        };
        outcomes.push(outcome);

        let potential = n as f64 / (k + 1) as f64 * total_score as f64;
        log::info!("Score: {}, potential score: {:.1}", total_score, potential);
    }

    let merged = merge(&solved_grids, grid.width(), grid.height())?;
    let absent_cells = grid.counts().absent;

    log::info!("Total score: {}", total_score);
    log::info!("Total score w/ absent cells: {}", total_score + absent_cells);

    Ok(RunSummary {
        tiles: outcomes,
        total_score,
        absent_cells,
        merged,
        placements,
    })
}
