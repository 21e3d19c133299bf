//! CSV reading and writing for reference tables.

use crate::error::PatrolSheetError;
use crate::error::ResultMessage;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Table;
use csv::ReaderBuilder;
use csv::WriterBuilder;
use std::io::Read;
use std::io::Write;
use std::path::Path;

/// Reads a CSV file whose first record is the header. All values stay text.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table, PatrolSheetError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = std::fs::File::open(path)
        .map_err(PatrolSheetError::from)
        .with_prefix(&format!("open '{}'", path.display()))?;
    from_reader(&name, file).with_prefix(&format!("read '{}'", path.display()))
}

/// Reads CSV text from any reader.
pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Table, PatrolSheetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record?.iter().map(|value| value.trim_start_matches('\u{feff}').to_owned()).collect::<Vec<_>>(),
        None => Err(SpreadsheetError::MissingHeaderRow(name.to_owned()))?,
    };
    let mut table = Table::new(name, &header);
    for record in records {
        table.push(record?.iter());
    }
    Ok(table)
}

/// Writes a table as CSV, header first.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<(), PatrolSheetError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .map_err(PatrolSheetError::from)
        .with_prefix(&format!("create '{}'", path.display()))?;
    to_writer(table, file)?;
    log::info!("CSV file exported to: {}", path.display());
    Ok(())
}

/// Writes CSV text to any writer.
pub fn to_writer<W: Write>(table: &Table, writer: W) -> Result<(), PatrolSheetError> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
