pub mod parse;
pub mod partition;
pub mod render;
pub mod types;

pub use parse::{LoadedGrid, load_grid, parse_grid, read_grid};
pub use partition::{Tile, TileSpec, merge, partition, tile_specs};
pub use types::{Cell, CellKind, Coord, Grid, KindCounts};
