//! A plain table of text cells with a named header row.

/// Rows of text cells under a header. Rows may be shorter than the header;
/// missing cells read as empty strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Table name (sheet name or file stem)
    pub name: String,
    /// Column names
    pub header: Vec<String>,
    /// Data rows, header excluded
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new<S: AsRef<str>>(name: &str, header: &[S]) -> Self {
        Self {
            name: name.to_owned(),
            header: header.iter().map(|column| column.as_ref().to_owned()).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from a dense grid whose first row is the header.
    pub fn from_grid(name: &str, mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self { name: name.to_owned(), ..Self::default() };
        }
        let header = grid.remove(0);
        Self {
            name: name.to_owned(),
            header,
            rows: grid,
        }
    }

    /// Appends a data row.
    pub fn push<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with this exact (trimmed) header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column.trim() == name)
    }

    /// Cell text, empty when the row or column does not exist.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|record| record.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Sets a cell, growing a short row with empty cells.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) {
        if let Some(record) = self.rows.get_mut(row) {
            if record.len() <= col {
                record.resize(col + 1, String::new());
            }
            record[col] = value.to_owned();
        }
    }

    /// Values of a named column, one per row.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let col = self.column_index(name)?;
        Some((0..self.rows.len()).map(move |row| self.cell(row, col)))
    }
}
