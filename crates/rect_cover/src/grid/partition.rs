use serde::Serialize;

use crate::error::{CoverError, Result};
use crate::grid::types::{Coord, Grid};

/// Position of one tile inside the partitioned grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileSpec {
    pub index: usize, // row-major tile order
    pub col: usize,   // tile column i
    pub row: usize,   // tile row j
    pub origin: Coord,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub spec: TileSpec,
    pub grid: Grid,
}

/// Column (or row) extents for `num` near-equal slices of `len`;
/// the last slice absorbs the remainder.
fn split_axis(len: usize, num: usize) -> Vec<(usize, usize)> {
    let step = len / num;
    (0..num)
        .map(|k| {
            let start = k * step;
            let size = if k == num - 1 { len - start } else { step };
            (start, size)
        })
        .collect()
}

/// Tile layout without copying cells
pub fn tile_specs(width: usize, height: usize, num_x: usize, num_y: usize) -> Result<Vec<TileSpec>> {
    if num_x == 0 || num_x > width || num_y == 0 || num_y > height {
        return Err(CoverError::Partition(format!(
            "cannot split {}x{} grid into {}x{} tiles",
            width, height, num_x, num_y
        )));
    }

    let cols = split_axis(width, num_x);
    let rows = split_axis(height, num_y);

    let mut specs = Vec::with_capacity(num_x * num_y);
    for (j, &(y, h)) in rows.iter().enumerate() {
        for (i, &(x, w)) in cols.iter().enumerate() {
            specs.push(TileSpec {
                index: specs.len(),
                col: i,
                row: j,
                origin: Coord::new(x, y),
                width: w,
                height: h,
            });
        }
    }
    Ok(specs)
}

/// Split a grid into num_x * num_y tiles in row-major order
pub fn partition(grid: &Grid, num_x: usize, num_y: usize) -> Result<Vec<Tile>> {
    tile_specs(grid.width(), grid.height(), num_x, num_y)?
        .into_iter()
        .map(|spec| {
            let sub = grid.sub_grid(spec.origin.x, spec.origin.y, spec.width, spec.height)?;
            Ok(Tile { spec, grid: sub })
        })
        .collect()
}

/// Reassemble tiles produced by `partition` (same row-major order)
///
/// Tile columns are discovered from the accumulated widths of the first
/// tile row, tile rows from the accumulated heights of each row's first
/// tile. Any tile that does not line up is a fatal `Merge` error.
pub fn merge(tiles: &[Grid], width: usize, height: usize) -> Result<Grid> {
    if tiles.is_empty() {
        return Err(CoverError::Merge("no tiles to merge".to_string()));
    }

    // tiles per row
    let mut num_x = 0;
    let mut acc_width = 0;
    while acc_width < width {
        let tile = tiles.get(num_x).ok_or_else(|| {
            CoverError::Merge(format!(
                "first tile row covers only {} of {} columns",
                acc_width, width
            ))
        })?;
        acc_width += tile.width();
        num_x += 1;
    }
    if acc_width != width {
        return Err(CoverError::Merge(format!(
            "tile widths sum to {} but target width is {}",
            acc_width, width
        )));
    }
    if tiles.len() % num_x != 0 {
        return Err(CoverError::Merge(format!(
            "{} tiles cannot form rows of {}",
            tiles.len(),
            num_x
        )));
    }

    let rows: Vec<&[Grid]> = tiles.chunks(num_x).collect();
    let acc_height: usize = rows.iter().map(|r| r[0].height()).sum();
    if acc_height != height {
        return Err(CoverError::Merge(format!(
            "tile heights sum to {} but target height is {}",
            acc_height, height
        )));
    }

    for (j, row) in rows.iter().enumerate() {
        for (i, tile) in row.iter().enumerate() {
            if tile.width() != tiles[i].width() || tile.height() != row[0].height() {
                return Err(CoverError::Merge(format!(
                    "tile ({}, {}) is {}x{}, expected {}x{}",
                    i,
                    j,
                    tile.width(),
                    tile.height(),
                    tiles[i].width(),
                    row[0].height()
                )));
            }
            if !tile.is_complete() {
                return Err(CoverError::Merge(format!("tile ({}, {}) is incomplete", i, j)));
            }
        }
    }

    let mut merged = Grid::new(width, height);
    for row in &rows {
        for y in 0..row[0].height() {
            for tile in row.iter() {
                for x in 0..tile.width() {
                    merged.push(tile.cell(x, y));
                }
            }
        }
    }
    Ok(merged)
}
