//! # Spreadsheet I/O
//!
//! Reading worksheets out of `.xlsx` workbooks and writing tables back out as
//! `.xlsx` or CSV. The allocator never touches a file format directly; it only
//! sees the [`Table`](crate::table::Table) produced here.
use thiserror::Error;

pub(crate) mod cell;
pub mod criteria;
pub mod delimited;
pub(crate) mod reference;
pub(crate) mod sheet;
pub mod writer;
pub mod xlsx;

/// Errors raised while reading or writing workbook files.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// A required part is missing from the workbook package
    #[error("Missing workbook part '{0}'")]
    FileError(String),

    /// The workbook declares no worksheets
    #[error("Spreadsheet '{0}' contains no sheets")]
    SpreadsheetEmptyError(String),

    /// No worksheet matched the requested name
    #[error("Sheet not found in '{0}'")]
    SheetNotFound(String),

    /// A cell holds an error value such as `#N/A`
    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),

    /// A delimited file has no header row
    #[error("Missing header row in '{0}'")]
    MissingHeaderRow(String),
}
