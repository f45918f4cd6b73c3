use itertools::iproduct;
use std::fmt;

use crate::config::ProblemParams;

/// Rectangle shape (width x height) in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RectShape {
    pub width: usize,
    pub height: usize,
}

impl RectShape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for RectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// All shapes with 1 <= w, h <= max_side and w * h <= max_area
pub fn rectangle_catalog(params: &ProblemParams) -> Vec<RectShape> {
    iproduct!(1..=params.max_side, 1..=params.max_side)
        .filter(|&(w, h)| w * h <= params.max_area)
        .map(|(w, h)| RectShape::new(w, h))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_area_four() {
        let shapes = rectangle_catalog(&ProblemParams::new(2, 4));
        let expected: Vec<RectShape> = [
            (1, 1),
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 1),
            (2, 2),
            (3, 1),
            (4, 1),
        ]
        .into_iter()
        .map(|(w, h)| RectShape::new(w, h))
        .collect();
        assert_eq!(shapes, expected);
    }

    #[test]
    fn test_catalog_respects_max_side() {
        let params = ProblemParams {
            min_special: 1,
            max_area: 12,
            max_side: 3,
        };
        let shapes = rectangle_catalog(&params);
        assert!(shapes.iter().all(|s| s.width <= 3 && s.height <= 3));
        assert!(shapes.contains(&RectShape::new(3, 3)));
        assert!(!shapes.contains(&RectShape::new(4, 3)));
        assert_eq!(shapes.len(), 9);
    }

    #[test]
    fn test_catalog_area_twelve() {
        let shapes = rectangle_catalog(&ProblemParams::new(3, 12));
        assert!(shapes.iter().all(|s| s.area() <= 12));
        assert!(shapes.contains(&RectShape::new(12, 1)));
        assert!(shapes.contains(&RectShape::new(3, 4)));
        assert!(!shapes.contains(&RectShape::new(5, 3)));
        // Σ_{w=1..12} floor(12 / w)
        assert_eq!(shapes.len(), 35);
    }
}
