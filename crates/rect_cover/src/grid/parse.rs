use crate::config::ProblemParams;
use crate::constants::*;
use crate::error::{CoverError, Result};
use crate::grid::types::{Cell, CellKind, Grid};

use std::io::Read;
use std::path::Path;

/// Grid plus the parameters carried in the file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub params: ProblemParams,
}

/// Reads a grid file
///
/// Format:
/// ```text
/// <height> <width> <min_special> <max_area>
/// <width symbols>   (x height lines)
/// ```
/// Symbols: `-`/`T` plain, `+`/`H` special, `x` selected plain,
/// `o` selected special, `#`/`.` absent.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<LoadedGrid> {
    let file = std::fs::File::open(path)?;
    read_grid(file)
}

pub fn read_grid<R: Read>(mut reader: R) -> Result<LoadedGrid> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_grid(&content)
}

pub fn parse_grid(content: &str) -> Result<LoadedGrid> {
    let mut lines = content.lines().enumerate();

    let (_, header) = lines.next().ok_or_else(|| CoverError::GridParse {
        line: 1,
        message: "empty input".to_string(),
    })?;
    let (height, width, params) = parse_header(header)?;

    let mut grid = Grid::new(width, height);
    for row in 0..height {
        let (idx, line) = lines.next().ok_or_else(|| CoverError::GridParse {
            line: row + 2,
            message: format!("expected {} rows, found {}", height, row),
        })?;
        let line_no = idx + 1;
        let line = line.trim_end_matches('\r');

        let symbols: Vec<char> = line.chars().collect();
        if symbols.len() != width {
            return Err(CoverError::GridParse {
                line: line_no,
                message: format!("expected {} cells, found {}", width, symbols.len()),
            });
        }
        for (col, &symbol) in symbols.iter().enumerate() {
            let cell = parse_symbol(symbol).ok_or(CoverError::UnknownCell {
                line: line_no,
                column: col + 1,
                symbol,
            })?;
            grid.push(cell);
        }
    }

    // trailing blank lines are allowed, anything else is not
    if let Some((idx, extra)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(CoverError::GridParse {
            line: idx + 1,
            message: format!("unexpected content after grid: '{}'", extra.trim()),
        });
    }

    log::debug!(
        "loaded {}x{} grid: {:?}, min_special={}, max_area={}",
        width,
        height,
        grid.counts(),
        params.min_special,
        params.max_area
    );

    Ok(LoadedGrid { grid, params })
}

fn parse_header(header: &str) -> Result<(usize, usize, ProblemParams)> {
    let values: Vec<usize> = header
        .split_whitespace()
        .map(|v| v.parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| CoverError::GridParse {
            line: 1,
            message: format!("invalid header '{}': {}", header.trim(), e),
        })?;

    let [height, width, min_special, max_area] = values[..] else {
        return Err(CoverError::GridParse {
            line: 1,
            message: format!(
                "header must be '<height> <width> <min_special> <max_area>', got '{}'",
                header.trim()
            ),
        });
    };

    if height == 0 || width == 0 {
        return Err(CoverError::GridParse {
            line: 1,
            message: format!("grid must be non-empty, got {}x{}", width, height),
        });
    }
    if max_area == 0 {
        return Err(CoverError::GridParse {
            line: 1,
            message: "max_area must be at least 1".to_string(),
        });
    }

    Ok((height, width, ProblemParams::new(min_special, max_area)))
}

pub fn parse_symbol(symbol: char) -> Option<Cell> {
    let cell = match symbol {
        SYMBOL_PLAIN | SYMBOL_PLAIN_ALT => Cell::new(CellKind::Plain),
        SYMBOL_SPECIAL | SYMBOL_SPECIAL_ALT => Cell::new(CellKind::Special),
        SYMBOL_SELECTED_PLAIN => Cell::with_selected(CellKind::Plain, true),
        SYMBOL_SELECTED_SPECIAL => Cell::with_selected(CellKind::Special, true),
        SYMBOL_ABSENT | SYMBOL_ABSENT_ALT => Cell::new(CellKind::Absent),
        _ => return None,
    };
    Some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "3 5 1 6\nTTTTT\nTMMMT\nTTTTT\n";

    #[test]
    fn test_parse_basic_grid() {
        let loaded = parse_grid("2 3 1 4\n-+#\nHT.\n").unwrap();
        let grid = &loaded.grid;
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.kind(0, 0), CellKind::Plain);
        assert_eq!(grid.kind(1, 0), CellKind::Special);
        assert_eq!(grid.kind(2, 0), CellKind::Absent);
        assert_eq!(grid.kind(0, 1), CellKind::Special);
        assert_eq!(grid.kind(2, 1), CellKind::Absent);
        assert_eq!(loaded.params, ProblemParams::new(1, 4));
        assert_eq!(grid.counts().absent, 2);
    }

    #[test]
    fn test_parse_selected_symbols() {
        let loaded = parse_grid("1 3 0 2\nxo-\n").unwrap();
        let grid = &loaded.grid;
        assert!(grid.cell(0, 0).selected);
        assert_eq!(grid.kind(0, 0), CellKind::Plain);
        assert!(grid.cell(1, 0).selected);
        assert_eq!(grid.kind(1, 0), CellKind::Special);
        assert!(!grid.cell(2, 0).selected);
    }

    #[test]
    fn test_unknown_symbol_is_rejected() {
        let result = parse_grid(SAMPLE);
        match result {
            Err(CoverError::UnknownCell {
                line,
                column,
                symbol,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, 2);
                assert_eq!(symbol, 'M');
            }
            other => panic!("expected UnknownCell, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_rows() {
        let result = parse_grid("3 2 1 4\n--\n++\n");
        assert!(matches!(result, Err(CoverError::GridParse { line: 4, .. })));
    }

    #[test]
    fn test_short_row() {
        let result = parse_grid("2 3 1 4\n---\n--\n");
        assert!(matches!(result, Err(CoverError::GridParse { line: 3, .. })));
    }

    #[test]
    fn test_invalid_header() {
        assert!(matches!(
            parse_grid("2 3 1\n---\n---\n"),
            Err(CoverError::GridParse { line: 1, .. })
        ));
        assert!(matches!(
            parse_grid("two 3 1 4\n"),
            Err(CoverError::GridParse { line: 1, .. })
        ));
        assert!(matches!(
            parse_grid(""),
            Err(CoverError::GridParse { line: 1, .. })
        ));
        assert!(matches!(
            parse_grid("1 1 1 0\n-\n"),
            Err(CoverError::GridParse { line: 1, .. })
        ));
    }

    #[test]
    fn test_trailing_content_rejected() {
        assert!(parse_grid("1 2 1 2\n--\n\n").is_ok());
        assert!(parse_grid("1 2 1 2\n--\n++\n").is_err());
    }

    #[test]
    fn test_crlf_line_endings() {
        let loaded = parse_grid("2 2 1 2\r\n-+\r\n+-\r\n").unwrap();
        assert_eq!(loaded.grid.count_special(), 2);
    }

    #[test]
    fn test_load_grid_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "2 2 1 4\nHH\nT.\n").unwrap();
        let loaded = load_grid(file.path()).unwrap();
        assert_eq!(loaded.grid.len(), 4);
        assert_eq!(loaded.grid.count_special(), 2);
    }

    #[test]
    fn test_load_grid_nonexistent() {
        let result = load_grid("nonexistent_grid.txt");
        assert!(matches!(result, Err(CoverError::Io(_))));
    }
}
