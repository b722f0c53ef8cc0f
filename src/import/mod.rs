mod csv;

pub use self::csv::{diagram_from_csv, diagram_from_rows, read_csv_file, SchemaRow};

/// Tables per grid row when placing imported tables
pub const TABLES_PER_ROW: usize = 3;
/// Horizontal distance between grid cells
pub const HORIZONTAL_SPACING: f64 = 500.0;
/// Vertical distance between grid cells
pub const VERTICAL_SPACING: f64 = 400.0;
/// Offset of the first cell from the canvas origin
pub const GRID_OFFSET: f64 = 100.0;
