use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::{
    config::{PartitionConfig, ProblemParams},
    error::{CoverError, Result},
    grid::{Grid, KindCounts},
    optimize::{RunSummary, TileOutcome},
};

#[derive(Debug, Clone, Serialize)]
pub struct GridSummary {
    pub width: usize,
    pub height: usize,
    pub counts: KindCounts,
}

/// Selected rectangle in whole-grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementRecord {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// 実行結果のレポート
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub grid: GridSummary,
    pub params: ProblemParams,
    pub partition: PartitionConfig,
    pub total_score: usize,
    pub absent_cells: usize,
    pub total_with_absent: usize,
    pub failed_tiles: usize,
    pub solve_time_ms: u64,
    pub tiles: Vec<TileOutcome>,
    pub placements: Vec<PlacementRecord>,
}

impl RunReport {
    pub fn new(
        grid: &Grid,
        params: &ProblemParams,
        partition: &PartitionConfig,
        summary: &RunSummary,
        solve_time_ms: u64,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            grid: GridSummary {
                width: grid.width(),
                height: grid.height(),
                counts: grid.counts(),
            },
            params: *params,
            partition: partition.clone(),
            total_score: summary.total_score,
            absent_cells: summary.absent_cells,
            total_with_absent: summary.total_with_absent(),
            failed_tiles: summary.failed_tiles(),
            solve_time_ms,
            tiles: summary.tiles.clone(),
            placements: summary
                .placements
                .iter()
                .map(|p| PlacementRecord {
                    x: p.anchor.x,
                    y: p.anchor.y,
                    width: p.shape.width,
                    height: p.shape.height,
                })
                .collect(),
        }
    }

    /// Pretty JSON into `dir`, returns the written path
    pub fn save_json<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = output_path(dir.as_ref(), "cover_report", "json")?;
        let content = serde_json::to_string_pretty(self)?;
        write_file(&path, &content)?;
        log::info!("report saved to: {}", path.display());
        Ok(path)
    }
}

/// Solved grid in the loadable text format, returns the written path
pub fn save_solved_grid<P: AsRef<Path>>(grid: &Grid, params: &ProblemParams, dir: P) -> Result<PathBuf> {
    let path = output_path(dir.as_ref(), "solved_grid", "txt")?;
    write_file(&path, &grid.to_file_string(params))?;
    log::info!("solved grid saved to: {}", path.display());
    Ok(path)
}

fn output_path(dir: &Path, stem: &str, ext: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| CoverError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    Ok(dir.join(format!("{stem}_{timestamp}.{ext}")))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| CoverError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::grid::{load_grid, parse_grid};
    use crate::optimize::solve_tiles;

    fn solved_line() -> (Grid, ProblemParams, PartitionConfig, RunSummary) {
        let loaded = parse_grid("1 4 2 4\n++++\n").unwrap();
        let partition = PartitionConfig { num_x: 2, num_y: 1 };
        let summary = solve_tiles(
            &loaded.grid,
            &loaded.params,
            &partition,
            &SolverConfig::default(),
        )
        .unwrap();
        (loaded.grid, loaded.params, partition, summary)
    }

    #[test]
    fn test_save_json_report() {
        let (grid, params, partition, summary) = solved_line();
        let report = RunReport::new(&grid, &params, &partition, &summary, 12);

        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested");
        let path = report.save_json(&out_dir).unwrap();
        assert!(path.starts_with(&out_dir));

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_score"], 4);
        assert_eq!(value["absent_cells"], 0);
        assert_eq!(value["failed_tiles"], 0);
        assert_eq!(value["solve_time_ms"], 12);
        assert_eq!(value["grid"]["counts"]["special"], 4);
        assert_eq!(value["tiles"].as_array().unwrap().len(), 2);
        assert_eq!(value["tiles"][1]["status"]["status"], "solved");
        assert_eq!(value["tiles"][1]["spec"]["origin"]["x"], 2);
        assert_eq!(value["placements"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_save_solved_grid_reloads() {
        let (_, params, _, summary) = solved_line();

        let dir = tempfile::tempdir().unwrap();
        let path = save_solved_grid(&summary.merged, &params, dir.path()).unwrap();

        let reloaded = load_grid(&path).unwrap();
        assert_eq!(reloaded.grid, summary.merged);
        assert_eq!(reloaded.params, params);
    }
}
