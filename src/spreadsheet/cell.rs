/// Types of cell data found in a worksheet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as `0`/`1`
    Boolean,
    /// Numeric values, kept in their stored text form
    Number,
    /// Inline string values and formula string results
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Maps the `t` attribute of a worksheet cell to a cell type.
    pub(crate) fn from_attribute(kind: Option<&str>) -> Self {
        match kind {
            Some("inlineStr") | Some("str") | Some("d") => CellType::InlineString,
            Some("s") => CellType::SharedString,
            Some("b") => CellType::Boolean,
            Some("e") => CellType::Error,
            _ => CellType::Number,
        }
    }
}

/// Represents a single cell in a worksheet with position, type, and value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the worksheet
    pub(crate) value: String,
}

impl Cell {
    /// Resolves the display text of the cell, looking shared strings up by index.
    pub(crate) fn text(&self, shared_strings: &[String]) -> Option<String> {
        match self.kind {
            CellType::Empty | CellType::Error => None,
            CellType::Boolean => Some(if self.value == "1" { "TRUE" } else { "FALSE" }.to_owned()),
            CellType::SharedString => {
                let index = self.value.trim().parse::<usize>().ok()?;
                shared_strings.get(index).cloned()
            }
            CellType::Number | CellType::InlineString => Some(self.value.to_owned()),
        }
    }
}
