use crate::{
    constants::{DEFAULT_OUTPUT_DIR, DEFAULT_SOLUTION_THRESHOLD},
    error::{CoverError, Result},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-run problem parameters shared by the grid, catalog and candidate generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProblemParams {
    pub min_special: usize, // minimum Special cells per rectangle
    pub max_area: usize,    // w * h <= max_area
    pub max_side: usize,    // 1 <= w, h <= max_side
}

impl ProblemParams {
    /// max_side defaults to max_area (every side length that can fit the area)
    pub fn new(min_special: usize, max_area: usize) -> Self {
        Self {
            min_special,
            max_area,
            max_side: max_area,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_area == 0 {
            return Err(CoverError::Config("max_area must be at least 1".to_string()));
        }
        if self.max_side == 0 {
            return Err(CoverError::Config("max_side must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// メイン設定構造体
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub problem: ProblemOverrides,
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub grid_path: Option<String>,
}

/// グリッドファイルのヘッダ値を上書きする（未指定ならファイルの値を使う）
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProblemOverrides {
    pub min_special: Option<usize>,
    pub max_area: Option<usize>,
    pub max_side: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PartitionConfig {
    pub num_x: usize,
    pub num_y: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { num_x: 1, num_y: 1 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolverConfig {
    /// 解の閾値（二値変数の読み戻し）
    #[serde(default = "default_threshold")]
    pub solution_threshold: f64,
    /// 求解後に解の整合性を検証する
    #[serde(default = "default_verify")]
    pub verify: bool,
}

fn default_threshold() -> f64 {
    DEFAULT_SOLUTION_THRESHOLD
}

fn default_verify() -> bool {
    true
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solution_threshold: DEFAULT_SOLUTION_THRESHOLD,
            verify: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default)]
    pub save_report: bool,
    #[serde(default)]
    pub save_grid: bool,
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUTPUT_DIR.to_string(),
            save_report: false,
            save_grid: false,
        }
    }
}

impl Config {
    /// 設定ファイルから読み込み
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoverError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<()> {
        if self.partition.num_x == 0 || self.partition.num_y == 0 {
            return Err(CoverError::Config(format!(
                "partition must be at least 1x1, got {}x{}",
                self.partition.num_x, self.partition.num_y
            )));
        }

        let threshold = self.solver.solution_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(CoverError::Config(format!(
                "solution_threshold must be in (0, 1), got {}",
                threshold
            )));
        }

        if self.problem.max_area == Some(0) || self.problem.max_side == Some(0) {
            return Err(CoverError::Config(
                "max_area and max_side must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// ファイルヘッダの値に上書き設定を適用
    pub fn resolve_params(&self, from_file: ProblemParams) -> Result<ProblemParams> {
        let max_area = self.problem.max_area.unwrap_or(from_file.max_area);
        let params = ProblemParams {
            min_special: self.problem.min_special.unwrap_or(from_file.min_special),
            max_area,
            // an explicit max_area override widens the default side bound with it
            max_side: self
                .problem
                .max_side
                .unwrap_or(if self.problem.max_area.is_some() {
                    max_area
                } else {
                    from_file.max_side
                }),
        };
        params.validate()?;
        Ok(params)
    }
}
