pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod optimize;
pub mod report;

pub use config::{Config, ProblemParams};
pub use error::{CoverError, Result};
pub use grid::{Cell, CellKind, Coord, Grid, LoadedGrid, load_grid, merge, parse_grid, partition};
pub use optimize::{CoverModel, GoodLpBackend, MilpBackend, RunSummary, solve_tiles};
pub use report::{RunReport, save_solved_grid};
