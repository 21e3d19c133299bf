use crate::error::PatrolSheetError;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::index_to_col;
use crate::table::Table;
use regex::Regex;
use thiserror::Error;

/// Errors related to column layout parsing.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid column '{0}'")]
    FormatError(String),

    #[error("Missing column name '{0}' in header")]
    MissingHeaderColumn(String),
}

/// Zero-based positions of the columns the allocator reads and writes.
///
/// The point column is both read (raw point value) and written (point ID),
/// so a re-run sees the IDs it produced before.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Layout {
    pub point: usize,
    pub equipment_name: usize,
    pub equipment_id: usize,
    pub item_name: usize,
    pub item_id: usize,
}

impl Default for Layout {
    /// Columns `A` to `E`: point, equipment name, equipment ID, item name, item ID.
    fn default() -> Self {
        Layout {
            point: 0,
            equipment_name: 1,
            equipment_id: 2,
            item_name: 3,
            item_id: 4,
        }
    }
}

impl Layout {
    /// Builds a layout from column letters, in the order point, equipment name,
    /// equipment ID, item name, item ID.
    pub fn from_letters(
        point: &str,
        equipment_name: &str,
        equipment_id: &str,
        item_name: &str,
        item_id: &str,
    ) -> Result<Self, PatrolSheetError> {
        Ok(Layout {
            point: parse_column(point)?,
            equipment_name: parse_column(equipment_name)?,
            equipment_id: parse_column(equipment_id)?,
            item_name: parse_column(item_name)?,
            item_id: parse_column(item_id)?,
        })
    }

    /// Resolves each column by its header name.
    pub fn from_header(
        table: &Table,
        point: &str,
        equipment_name: &str,
        equipment_id: &str,
        item_name: &str,
        item_id: &str,
    ) -> Result<Self, PatrolSheetError> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| LayoutError::MissingHeaderColumn(name.to_owned()))
        };
        Ok(Layout {
            point: find(point)?,
            equipment_name: find(equipment_name)?,
            equipment_id: find(equipment_id)?,
            item_name: find(item_name)?,
            item_id: find(item_id)?,
        })
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "point={} equipment={}/{} item={}/{}",
            index_to_col(self.point),
            index_to_col(self.equipment_name),
            index_to_col(self.equipment_id),
            index_to_col(self.item_name),
            index_to_col(self.item_id),
        )
    }
}

/// Parses column letters such as `C` or `AB`.
fn parse_column(value: &str) -> Result<usize, PatrolSheetError> {
    let pattern = Regex::new(r"^\s*([A-Za-z]{1,3})\s*$").expect("Hardcode regex pattern");
    let index = pattern
        .captures(value)
        .and_then(|captures| captures.get(1))
        .and_then(|matcher| col_to_index(matcher.as_str()))
        .ok_or_else(|| LayoutError::FormatError(value.to_owned()))?;
    Ok(index)
}
