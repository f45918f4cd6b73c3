/// Grid file symbols
pub const SYMBOL_PLAIN: char = '-';
pub const SYMBOL_PLAIN_ALT: char = 'T';
pub const SYMBOL_SPECIAL: char = '+';
pub const SYMBOL_SPECIAL_ALT: char = 'H';
pub const SYMBOL_SELECTED_PLAIN: char = 'x';
pub const SYMBOL_SELECTED_SPECIAL: char = 'o';
pub const SYMBOL_ABSENT: char = '#';
pub const SYMBOL_ABSENT_ALT: char = '.';

/// Rendering frame
pub const FRAME_CORNER: char = '+';
pub const FRAME_HORIZONTAL: char = '=';
pub const FRAME_VERTICAL: char = '|';

/// Solver settings
pub const DEFAULT_SOLUTION_THRESHOLD: f64 = 0.5; // binary read-back cutoff

/// Default paths
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "out";
