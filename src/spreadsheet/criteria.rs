use glob::Pattern;

/// Criteria for selecting data from a workbook.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Sheet name pattern; the first matching sheet is read. `None` reads the first sheet.
    pub sheet_name_pattern: Option<Pattern>,

    /// Read error cells as empty instead of failing.
    pub error_as_empty: bool,

    /// Read error cells as their literal text (`#N/A`, `#DIV/0!`) instead of failing.
    pub error_as_text: bool,
}

impl Criteria {
    /// Checks if a sheet name matches the criteria pattern.
    /// Returns true if no pattern is specified.
    pub fn accept(&self, sheet_name: &str) -> bool {
        self.sheet_name_pattern
            .as_ref()
            .map(|pattern| pattern.matches(sheet_name))
            .unwrap_or(true)
    }
}
