use crate::spreadsheet::cell::Cell;

/// A worksheet read from a workbook, holding its non-empty cells in row order.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Highest row index seen
    pub(crate) row_upper_bound: Option<usize>,
    /// Highest column index seen
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, updating the data range.
    pub(crate) fn push(&mut self, cell: Cell) {
        if self.row_upper_bound.map(|row| row < cell.row).unwrap_or(true) {
            self.row_upper_bound = Some(cell.row);
        }
        if self.col_upper_bound.map(|col| col < cell.col).unwrap_or(true) {
            self.col_upper_bound = Some(cell.col);
        }
        self.cells.push(cell);
    }

    /// Expands the sparse cells into a dense grid anchored at `A1`.
    /// Rows and cells absent from the worksheet become empty strings, so blank
    /// rows between data survive the conversion.
    pub(crate) fn to_grid(&self, shared_strings: &[String]) -> Vec<Vec<String>> {
        let (rows, cols) = match self.row_upper_bound.zip(self.col_upper_bound) {
            Some((row, col)) => (row + 1, col + 1),
            None => return Vec::new(),
        };
        let mut grid = vec![vec![String::new(); cols]; rows];
        for cell in &self.cells {
            if let Some(text) = cell.text(shared_strings) {
                grid[cell.row][cell.col] = text;
            }
        }
        grid
    }
}
