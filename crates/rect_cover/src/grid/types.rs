use serde::Serialize;

use crate::error::{CoverError, Result};

/// Cell classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CellKind {
    Absent,  // cannot be covered
    Plain,   // scores when covered
    Special, // scores and counts toward min_special
}

/// A single cell. `selected` is a reporting decoration filled after solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub kind: CellKind,
    pub selected: bool,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Self {
            kind,
            selected: false,
        }
    }

    pub fn with_selected(kind: CellKind, selected: bool) -> Self {
        Self { kind, selected }
    }
}

/// Grid coordinate (x = column, y = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: usize, dy: usize) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Number of cells of each kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub absent: usize,
    pub plain: usize,
    pub special: usize,
}

impl KindCounts {
    fn record(&mut self, kind: CellKind) {
        match kind {
            CellKind::Absent => self.absent += 1,
            CellKind::Plain => self.plain += 1,
            CellKind::Special => self.special += 1,
        }
    }

    /// Cells that can ever be covered
    pub fn coverable(&self) -> usize {
        self.plain + self.special
    }

    pub fn total(&self) -> usize {
        self.absent + self.plain + self.special
    }
}

/// Row-major grid of classified cells; index(x, y) = x + width * y
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    counts: KindCounts,
}

impl Grid {
    /// Empty grid to be filled with `push` in row-major order
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: Vec::with_capacity(width * height),
            counts: KindCounts::default(),
        }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoverError::Dimension(format!(
                "grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        if cells.len() != width * height {
            return Err(CoverError::Dimension(format!(
                "expected {} cells for {}x{} grid, got {}",
                width * height,
                width,
                height,
                cells.len()
            )));
        }
        let mut grid = Self::new(width, height);
        for cell in cells {
            grid.push(cell);
        }
        Ok(grid)
    }

    pub fn from_kinds(width: usize, height: usize, kinds: &[CellKind]) -> Result<Self> {
        Self::from_cells(width, height, kinds.iter().map(|&k| Cell::new(k)).collect())
    }

    /// Append a cell, keeping the running per-kind counts
    pub fn push(&mut self, cell: Cell) {
        self.counts.record(cell.kind);
        self.cells.push(cell);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True once every cell has been pushed
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.width * self.height
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x + self.width * y
    }

    #[inline]
    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index % self.width, index / self.width)
    }

    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn kind(&self, x: usize, y: usize) -> CellKind {
        self.cell(x, y).kind
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn counts(&self) -> KindCounts {
        self.counts
    }

    pub fn count_special(&self) -> usize {
        self.counts.special
    }

    /// Number of cells marked selected
    pub fn count_selected(&self) -> usize {
        self.cells.iter().filter(|c| c.selected).count()
    }

    /// Copy of the rectangle [x, x+w) x [y, y+h) in row-major order
    pub fn sub_grid(&self, x: usize, y: usize, w: usize, h: usize) -> Result<Grid> {
        if w == 0 || h == 0 || x + w > self.width || y + h > self.height {
            return Err(CoverError::Dimension(format!(
                "sub-grid {}x{} at ({}, {}) does not fit in {}x{} grid",
                w, h, x, y, self.width, self.height
            )));
        }
        let mut sub = Grid::new(w, h);
        for j in y..y + h {
            for i in x..x + w {
                sub.push(self.cell(i, j));
            }
        }
        Ok(sub)
    }

    /// Same kinds with `selected` replaced by `flags[index]`
    pub fn with_selection(&self, flags: &[bool]) -> Grid {
        let mut out = Grid::new(self.width, self.height);
        for (cell, &selected) in self.cells.iter().zip(flags) {
            out.push(Cell::with_selected(cell.kind, selected));
        }
        out
    }

    /// Same kinds with every `selected` flag cleared
    pub fn cleared(&self) -> Grid {
        self.with_selection(&vec![false; self.cells.len()])
    }
}
