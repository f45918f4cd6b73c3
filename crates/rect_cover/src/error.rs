use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoverError>;

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Grid parse error at line {line}: {message}")]
    GridParse { line: usize, message: String },

    #[error("Unknown cell symbol '{symbol}' at line {line}, column {column}")]
    UnknownCell {
        line: usize,
        column: usize,
        symbol: char,
    },

    #[error("Grid dimension error: {0}")]
    Dimension(String),

    #[error("Partition error: {0}")]
    Partition(String),

    #[error("Merge error: {0}")]
    Merge(String),

    #[error("Model is infeasible")]
    Infeasible,

    #[error("Optimization solver error: {0}")]
    Solver(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write file {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Report error: {0}")]
    Report(String),
}

impl From<toml::de::Error> for CoverError {
    fn from(err: toml::de::Error) -> Self {
        CoverError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for CoverError {
    fn from(err: serde_json::Error) -> Self {
        CoverError::Report(format!("JSON error: {}", err))
    }
}

impl CoverError {
    /// Tile-local failures that the solve loop reports and skips.
    pub fn is_tile_local(&self) -> bool {
        matches!(self, CoverError::Infeasible | CoverError::Solver(_))
    }
}
