pub mod backend;
pub mod candidates;
pub mod catalog;
pub mod linearize;
pub mod lp;
pub mod model;
pub mod solve_loop;
pub mod verify;

pub use backend::{BackendSolution, LinearConstraint, LinearExpr, MilpBackend, Relation, VarId};
pub use candidates::{Placement, is_valid_placement, placements};
pub use catalog::{RectShape, rectangle_catalog};
pub use linearize::and_linearize;
pub use lp::GoodLpBackend;
pub use model::{CoverModel, ModelStats, PlacementVar, SolvedTile};
pub use solve_loop::{RunSummary, TileOutcome, TileStatus, solve_tiles, solve_tiles_with};
pub use verify::{Violation, check_solution};
