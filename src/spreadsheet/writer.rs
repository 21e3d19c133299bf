//! Writes tables to `.xlsx` workbooks.

use crate::error::PatrolSheetError;
use crate::error::ResultMessage;
use crate::table::Table;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Writes a table to a single-sheet workbook, header in row 1.
/// Empty cells are left unwritten so blank rows stay blank. Text that is a
/// plain decimal number is written as a number; everything else as a string.
/// Other worksheets, formulas and styles of a source workbook are not carried over.
pub fn write_table(table: &Table, path: impl AsRef<Path>) -> Result<(), PatrolSheetError> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    if !table.name.is_empty() {
        worksheet.set_name(&table.name)?;
    }

    for (col, name) in table.header.iter().enumerate() {
        if !name.is_empty() {
            worksheet.write_string(0, col as u16, name)?;
        }
    }
    for (index, record) in table.rows.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, value) in record.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match as_number(value) {
                Some(number) => worksheet.write_number(row, col as u16, number)?,
                None => worksheet.write_string(row, col as u16, value)?,
            };
        }
    }

    workbook
        .save(path)
        .map_err(PatrolSheetError::from)
        .with_prefix(&format!("save '{}'", path.display()))?;
    log::info!("Workbook saved to: {}", path.display());
    Ok(())
}

/// A value that reads back as the same text when stored as a number.
fn as_number(value: &str) -> Option<f64> {
    let number = value.parse::<f64>().ok().filter(|number| number.is_finite())?;
    (number.to_string() == value).then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::criteria::Criteria;
    use crate::spreadsheet::cell::CellType;
    use crate::spreadsheet::xlsx::read_table;
    use crate::spreadsheet::xlsx::XlsxSpreadsheet;

    #[test]
    fn written_workbook_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkitems.xlsx");
        let mut table = Table::new("Route", &["Point ID", "Equipment", "Equipment ID", "Item", "Item ID"]);
        table.push(["QH1-O-P01", "Pump A", "QH1-O-P01E01", "Pressure", "QH1-O-P01E01I01"]);
        table.push(["", "", "", "", ""]);
        table.push(["QH1-O-P02", "Fan & Motor", "QH1-O-P02E01", "", ""]);
        write_table(&table, &path).unwrap();

        let read = read_table(&path, &Criteria::default()).unwrap();
        assert_eq!(read.name, "Route");
        assert_eq!(read.header, table.header);
        assert_eq!(read.len(), 3);
        assert_eq!(read.rows[0], table.rows[0]);
        assert_eq!(read.rows[1], vec!["", "", "", "", ""]);
        assert_eq!(read.cell(2, 1), "Fan & Motor");
        assert_eq!(read.cell(2, 4), "");
    }

    #[test]
    fn numbers_stay_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.xlsx");
        let mut table = Table::new("Route", &["Item", "Limit", "Code"]);
        table.push(["Pressure", "12.5", "007"]);
        table.push(["Speed", "42", "-3"]);
        write_table(&table, &path).unwrap();

        let mut spreadsheet = XlsxSpreadsheet::open(&path).unwrap();
        let sheet = spreadsheet.read_sheet(&Criteria::default()).unwrap();
        let kind = |row: usize, col: usize| {
            sheet.cells.iter().find(|cell| cell.row == row && cell.col == col).map(|cell| cell.kind)
        };
        assert_eq!(kind(1, 1), Some(CellType::Number));
        assert_ne!(kind(1, 2), Some(CellType::Number));
        assert_eq!(kind(2, 2), Some(CellType::Number));

        let read = read_table(&path, &Criteria::default()).unwrap();
        assert_eq!(read.rows, table.rows);
    }

    #[test]
    fn number_detection() {
        assert_eq!(as_number("42"), Some(42.0));
        assert_eq!(as_number("12.5"), Some(12.5));
        assert_eq!(as_number("007"), None);
        assert_eq!(as_number("1e3"), None);
        assert_eq!(as_number("NaN"), None);
        assert_eq!(as_number("QH1-O-P01"), None);
    }
}
