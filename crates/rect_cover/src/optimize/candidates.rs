use itertools::iproduct;

use crate::grid::{CellKind, Coord, Grid};
use crate::optimize::catalog::RectShape;

/// A shape anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub shape: RectShape,
    pub anchor: Coord,
}

impl Placement {
    pub fn new(shape: RectShape, anchor: Coord) -> Self {
        Self { shape, anchor }
    }

    /// Cells of [x, x+w) x [y, y+h), row by row
    pub fn footprint(&self) -> impl Iterator<Item = Coord> + '_ {
        iproduct!(0..self.shape.height, 0..self.shape.width)
            .map(|(dy, dx)| self.anchor.offset(dx, dy))
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.anchor.x
            && c.x < self.anchor.x + self.shape.width
            && c.y >= self.anchor.y
            && c.y < self.anchor.y + self.shape.height
    }

    pub fn overlaps(&self, other: &Placement) -> bool {
        self.anchor.x < other.anchor.x + other.shape.width
            && other.anchor.x < self.anchor.x + self.shape.width
            && self.anchor.y < other.anchor.y + other.shape.height
            && other.anchor.y < self.anchor.y + self.shape.height
    }

    /// Variable label, e.g. `2x3_{4,1}`
    pub fn label(&self) -> String {
        format!("{}_{{{},{}}}", self.shape, self.anchor.x, self.anchor.y)
    }
}

/// Every anchor of `shape` inside the grid; empty if the shape does not fit
pub fn placements(grid: &Grid, shape: RectShape) -> Vec<Placement> {
    if shape.width > grid.width() || shape.height > grid.height() {
        return Vec::new();
    }
    let max_x = grid.width() - shape.width;
    let max_y = grid.height() - shape.height;
    iproduct!(0..=max_y, 0..=max_x)
        .map(|(y, x)| Placement::new(shape, Coord::new(x, y)))
        .collect()
}

/// Invalid on the first Absent cell, otherwise valid iff it holds at least
/// `min_special` Special cells
pub fn is_valid_placement(grid: &Grid, placement: &Placement, min_special: usize) -> bool {
    let mut special = 0;
    for c in placement.footprint() {
        match grid.kind(c.x, c.y) {
            CellKind::Absent => return false,
            CellKind::Special => special += 1,
            CellKind::Plain => {}
        }
    }
    special >= min_special
}

/// Number of Special cells under a placement
pub fn count_special(grid: &Grid, placement: &Placement) -> usize {
    placement
        .footprint()
        .filter(|c| grid.kind(c.x, c.y) == CellKind::Special)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse_grid;

    fn grid(text: &str) -> Grid {
        parse_grid(text).unwrap().grid
    }

    #[test]
    fn test_anchor_ranges() {
        let g = grid("3 4 0 12\n----\n----\n----\n");
        assert_eq!(placements(&g, RectShape::new(1, 1)).len(), 12);
        assert_eq!(placements(&g, RectShape::new(2, 3)).len(), 3);
        assert_eq!(placements(&g, RectShape::new(4, 3)).len(), 1);

        let last = *placements(&g, RectShape::new(2, 2)).last().unwrap();
        assert_eq!(last.anchor, Coord::new(2, 1));
    }

    #[test]
    fn test_shape_larger_than_grid_yields_nothing() {
        let g = grid("2 2 0 12\n--\n--\n");
        assert!(placements(&g, RectShape::new(3, 1)).is_empty());
        assert!(placements(&g, RectShape::new(1, 5)).is_empty());
    }

    #[test]
    fn test_footprint_order() {
        let p = Placement::new(RectShape::new(2, 2), Coord::new(1, 3));
        let cells: Vec<Coord> = p.footprint().collect();
        assert_eq!(
            cells,
            vec![
                Coord::new(1, 3),
                Coord::new(2, 3),
                Coord::new(1, 4),
                Coord::new(2, 4)
            ]
        );
        assert!(p.contains(Coord::new(2, 4)));
        assert!(!p.contains(Coord::new(3, 4)));
        assert_eq!(p.label(), "2x2_{1,3}");
    }

    #[test]
    fn test_validity_filter() {
        let g = grid("2 3 2 6\n+-+\n+#-\n");
        let row0 = Placement::new(RectShape::new(3, 1), Coord::new(0, 0));
        assert!(is_valid_placement(&g, &row0, 2));
        assert!(!is_valid_placement(&g, &row0, 3));

        // touches the absent cell
        let block = Placement::new(RectShape::new(2, 2), Coord::new(0, 0));
        assert!(!is_valid_placement(&g, &block, 0));

        let col0 = Placement::new(RectShape::new(1, 2), Coord::new(0, 0));
        assert!(is_valid_placement(&g, &col0, 2));
        assert_eq!(count_special(&g, &col0), 2);
    }

    #[test]
    fn test_overlaps() {
        let a = Placement::new(RectShape::new(2, 1), Coord::new(0, 0));
        let b = Placement::new(RectShape::new(1, 2), Coord::new(1, 0));
        let c = Placement::new(RectShape::new(1, 2), Coord::new(2, 0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
