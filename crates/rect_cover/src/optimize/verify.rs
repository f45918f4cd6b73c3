use std::fmt;

use crate::{
    grid::{CellKind, Coord},
    optimize::{
        candidates::{Placement, count_special},
        model::SolvedTile,
    },
};

/// Invariant broken by a solved tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Overlap(Placement, Placement),
    AbsentCovered(Coord),
    TooFewSpecial { placement: Placement, special: usize },
    OutOfBounds(Placement),
    /// marked covered but no selected placement contains it
    Unsupported(Coord),
    /// inside a selected placement but not marked covered
    Unmarked(Coord),
    ScoreMismatch { score: usize, covered: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Overlap(a, b) => write!(f, "{} overlaps {}", a.label(), b.label()),
            Violation::AbsentCovered(c) => write!(f, "absent cell ({}, {}) is covered", c.x, c.y),
            Violation::TooFewSpecial { placement, special } => write!(
                f,
                "{} holds only {} special cells",
                placement.label(),
                special
            ),
            Violation::OutOfBounds(p) => write!(f, "{} leaves the grid", p.label()),
            Violation::Unsupported(c) => {
                write!(f, "cell ({}, {}) is covered by no selected rectangle", c.x, c.y)
            }
            Violation::Unmarked(c) => {
                write!(f, "cell ({}, {}) lies in a selected rectangle but is not covered", c.x, c.y)
            }
            Violation::ScoreMismatch { score, covered } => {
                write!(f, "score {} but {} cells covered", score, covered)
            }
        }
    }
}

/// Check a solved tile against the covering rules; empty means consistent
pub fn check_solution(solved: &SolvedTile, min_special: usize) -> Vec<Violation> {
    let grid = &solved.grid;
    let mut violations = Vec::new();

    let in_bounds: Vec<&Placement> = solved
        .placements
        .iter()
        .filter(|p| {
            let fits = p.anchor.x + p.shape.width <= grid.width()
                && p.anchor.y + p.shape.height <= grid.height();
            if !fits {
                violations.push(Violation::OutOfBounds(**p));
            }
            fits
        })
        .collect();

    for (k, a) in in_bounds.iter().enumerate() {
        for b in &in_bounds[k + 1..] {
            if a.overlaps(b) {
                violations.push(Violation::Overlap(**a, **b));
            }
        }
        let special = count_special(grid, a);
        if special < min_special {
            violations.push(Violation::TooFewSpecial {
                placement: **a,
                special,
            });
        }
    }

    for (idx, cell) in grid.cells().iter().enumerate() {
        let c = grid.coord_of(idx);
        let supported = in_bounds.iter().any(|p| p.contains(c));
        if cell.selected && cell.kind == CellKind::Absent {
            violations.push(Violation::AbsentCovered(c));
        }
        if cell.selected && !supported {
            violations.push(Violation::Unsupported(c));
        }
        if !cell.selected && supported {
            violations.push(Violation::Unmarked(c));
        }
    }

    let covered = grid.count_selected();
    if covered != solved.score {
        violations.push(Violation::ScoreMismatch {
            score: solved.score,
            covered,
        });
    }

    violations
}
