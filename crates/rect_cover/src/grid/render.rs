use std::fmt;

use crate::config::ProblemParams;
use crate::constants::*;
use crate::grid::types::{Cell, CellKind, Grid};

/// Canonical symbol for a cell (selected cells use x / o)
pub fn cell_symbol(cell: Cell) -> char {
    match (cell.kind, cell.selected) {
        (CellKind::Absent, _) => SYMBOL_ABSENT,
        (CellKind::Plain, false) => SYMBOL_PLAIN,
        (CellKind::Plain, true) => SYMBOL_SELECTED_PLAIN,
        (CellKind::Special, false) => SYMBOL_SPECIAL,
        (CellKind::Special, true) => SYMBOL_SELECTED_SPECIAL,
    }
}

fn write_frame(f: &mut fmt::Formatter<'_>, width: usize) -> fmt::Result {
    write!(f, "{}", FRAME_CORNER)?;
    for _ in 0..width {
        write!(f, "{}", FRAME_HORIZONTAL)?;
    }
    writeln!(f, "{}", FRAME_CORNER)
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_frame(f, self.width())?;
        for y in 0..self.height() {
            write!(f, "{}", FRAME_VERTICAL)?;
            for x in 0..self.width() {
                write!(f, "{}", cell_symbol(self.cell(x, y)))?;
            }
            writeln!(f, "{}", FRAME_VERTICAL)?;
        }
        write_frame(f, self.width())
    }
}

impl Grid {
    /// Serialise in the grid file format so a solved grid can be reloaded
    pub fn to_file_string(&self, params: &ProblemParams) -> String {
        let mut out = format!(
            "{} {} {} {}\n",
            self.height(),
            self.width(),
            params.min_special,
            params.max_area
        );
        for y in 0..self.height() {
            out.extend((0..self.width()).map(|x| cell_symbol(self.cell(x, y))));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse::parse_grid;

    #[test]
    fn test_display_frame() {
        let loaded = parse_grid("2 3 1 4\nT+#\noxH\n").unwrap();
        let rendered = loaded.grid.to_string();
        assert_eq!(rendered, "+===+\n|-+#|\n|ox+|\n+===+\n");
    }

    #[test]
    fn test_file_string_reloads() {
        let loaded = parse_grid("2 3 2 6\nT+.\noxH\n").unwrap();
        let text = loaded.grid.to_file_string(&loaded.params);
        assert_eq!(text, "2 3 2 6\n-+#\nox+\n");

        let reloaded = parse_grid(&text).unwrap();
        assert_eq!(reloaded, loaded);
    }
}
