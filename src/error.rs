use thiserror::Error;

/// Main error type for the Patrol Sheet library.
/// Aggregates errors from various sources including standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum PatrolSheetError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error(transparent)]
    PatternError(#[from] glob::PatternError),

    // Third-party library errors
    #[error(transparent)]
    ZipError(#[from] zip::result::ZipError),

    #[error(transparent)]
    XmlError(#[from] quick_xml::Error),

    #[error(transparent)]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error(transparent)]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    XlsxWriterError(#[from] rust_xlsxwriter::XlsxError),

    // Helper module errors
    #[error(transparent)]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error(transparent)]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Configuration errors
    #[error(transparent)]
    LayoutError(#[from] crate::layout::LayoutError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, PatrolSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| PatrolSheetError::WithContextError(format!("{}: {}", message, e)))
    }
}
