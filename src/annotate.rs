//! Runs the allocator over a sheet and writes the derived IDs back into it.

use crate::allocator::allocate;
use crate::allocator::Recovery;
use crate::allocator::Row;
use crate::error::PatrolSheetError;
use crate::layout::Layout;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::writer::write_table;
use crate::spreadsheet::xlsx::read_table;
use crate::table::Table;
use anyhow::Context;
use anyhow::Result;
use glob::Pattern;
use std::path::Path;

/// Everything the annotation workflow needs to know about its input.
#[derive(Clone, Debug)]
pub struct AllocationCriteria {
    /// Point ID prefix, e.g. `QH2-O`
    pub prefix: String,
    /// Where the name and ID columns live
    pub layout: Layout,
    /// Worksheet selector; `None` takes the first sheet
    pub sheet_name: Option<Pattern>,
    /// Leading rows copied through untouched
    pub header_rows: usize,
    /// Error cells (`#N/A`, `#DIV/0!`) read as their text; otherwise they fail the read
    pub error_as_text: bool,
}

impl AllocationCriteria {
    /// Default layout (`A` to `E`), first worksheet, one header row, error
    /// cells kept as text.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            layout: Layout::default(),
            sheet_name: None,
            header_rows: 1,
            error_as_text: true,
        }
    }

    /// Selects the first worksheet whose name matches a glob pattern such as `Route*`.
    pub fn with_sheet_name(mut self, pattern: &str) -> Result<Self, PatrolSheetError> {
        self.sheet_name = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    fn reader_criteria(&self) -> Criteria {
        Criteria {
            sheet_name_pattern: self.sheet_name.clone(),
            error_as_empty: false,
            error_as_text: self.error_as_text,
        }
    }
}

/// An annotated table and the fallbacks applied while annotating it.
#[derive(Clone, Debug)]
pub struct Annotation {
    pub table: Table,
    /// Recoveries; `row` counts from the first line after the header rows
    pub recoveries: Vec<Recovery>,
    pub point_count: usize,
}

/// Derives point, equipment and item IDs for every line of `table` below the
/// header rows. IDs are written into their layout columns; a line that gets
/// no ID of some kind keeps whatever that cell held before.
pub fn annotate_table(table: &Table, criteria: &AllocationCriteria) -> Annotation {
    let layout = criteria.layout;
    let mut lines: Vec<Vec<String>> = std::iter::once(table.header.clone())
        .chain(table.rows.iter().cloned())
        .collect();
    let start = criteria.header_rows.min(lines.len());

    let rows = lines[start..].iter().map(|line| {
        Row::new(
            cell(line, layout.point),
            cell(line, layout.equipment_name),
            cell(line, layout.item_name),
        )
    });
    let allocation = allocate(&criteria.prefix, rows);

    for (line, row) in lines[start..].iter_mut().zip(&allocation.rows) {
        for (col, value) in [
            (layout.point, &row.point_id),
            (layout.equipment_id, &row.equipment_id),
            (layout.item_id, &row.item_id),
        ] {
            if let Some(value) = value {
                if line.len() <= col {
                    line.resize(col + 1, String::new());
                }
                line[col] = value.to_owned();
            }
        }
    }

    Annotation {
        table: Table::from_grid(&table.name, lines),
        recoveries: allocation.recoveries,
        point_count: allocation.point_count,
    }
}

fn cell(line: &[String], col: usize) -> &str {
    line.get(col).map(String::as_str).unwrap_or("")
}

/// Reads a workbook, annotates the selected sheet and saves it as a new workbook.
pub fn annotate_workbook(input: impl AsRef<Path>, output: impl AsRef<Path>, criteria: &AllocationCriteria) -> Result<Annotation> {
    let input = input.as_ref();
    let output = output.as_ref();
    log::debug!("annotating '{}' with prefix {} ({})", input.display(), criteria.prefix, criteria.layout);
    let table = read_table(input, &criteria.reader_criteria())
        .with_context(|| format!("Failed to read workbook: {}", input.display()))?;
    let annotation = annotate_table(&table, criteria);
    write_table(&annotation.table, output)
        .with_context(|| format!("Failed to save workbook: {}", output.display()))?;
    log::info!(
        "assigned {} points in '{}', {} recoveries, saved to {}",
        annotation.point_count,
        table.name,
        annotation.recoveries.len(),
        output.display()
    );
    Ok(annotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Table {
        let mut table = Table::new("Route", &["Point ID", "Equipment", "Equipment ID", "Item", "Item ID"]);
        table.push(["", "PumpA", "", "Pressure", ""]);
        table.push(["", "PumpA", "", "Temp"]);
        table.push(Vec::<String>::new());
        table.push(["", "PumpB", "", "Flow", ""]);
        table.push(["", "", "", "Noise", ""]);
        table
    }

    #[test]
    fn writes_ids_into_layout_columns() {
        let annotation = annotate_table(&sheet(), &AllocationCriteria::new("QH1-O"));
        let table = annotation.table;
        assert_eq!(table.rows[0], vec!["QH1-O-P01", "PumpA", "QH1-O-P01E01", "Pressure", "QH1-O-P01E01I01"]);
        assert_eq!(table.rows[1], vec!["QH1-O-P01", "PumpA", "QH1-O-P01E01", "Temp", "QH1-O-P01E01I02"]);
        assert!(table.rows[2].is_empty());
        assert_eq!(table.rows[3], vec!["QH1-O-P02", "PumpB", "QH1-O-P02E01", "Flow", "QH1-O-P02E01I01"]);
        assert_eq!(table.rows[4], vec!["QH1-O-P02", "", "QH1-O-P02E01", "Noise", "QH1-O-P02E01I02"]);
        assert_eq!(annotation.point_count, 2);
        assert!(annotation.recoveries.is_empty());
    }

    #[test]
    fn custom_layout() {
        let mut table = Table::new("Route", &["Item", "Equipment", "Point"]);
        table.push(["Pressure", "Pump", ""]);
        table.push(["Flow", "", ""]);
        let criteria = AllocationCriteria {
            layout: Layout::from_letters("C", "B", "D", "A", "E").unwrap(),
            ..AllocationCriteria::new("X")
        };
        let annotated = annotate_table(&table, &criteria).table;
        assert_eq!(annotated.rows[0], vec!["Pressure", "Pump", "X-P01", "X-P01E01", "X-P01E01I01"]);
        assert_eq!(annotated.rows[1], vec!["Flow", "", "X-P01", "X-P01E01", "X-P01E01I02"]);
    }

    #[test]
    fn extra_header_rows_are_copied() {
        let mut table = Table::new("Route", &["Route QH1"]);
        table.push(["Point", "Equipment", "Equipment ID", "Item", "Item ID"]);
        table.push(["", "Pump", "", "Pressure", ""]);
        let criteria = AllocationCriteria {
            header_rows: 2,
            ..AllocationCriteria::new("X")
        };
        let annotation = annotate_table(&table, &criteria);
        assert_eq!(annotation.table.header, vec!["Route QH1"]);
        assert_eq!(annotation.table.rows[0], vec!["Point", "Equipment", "Equipment ID", "Item", "Item ID"]);
        assert_eq!(annotation.table.rows[1], vec!["X-P01", "Pump", "X-P01E01", "Pressure", "X-P01E01I01"]);
        assert_eq!(annotation.point_count, 1);
    }

    #[test]
    fn without_header_rows_first_line_is_data() {
        let table = Table::new("Route", &["", "Pump", "", "Pressure"]);
        let criteria = AllocationCriteria {
            header_rows: 0,
            ..AllocationCriteria::new("X")
        };
        let annotated = annotate_table(&table, &criteria).table;
        assert_eq!(annotated.header, vec!["X-P01", "Pump", "X-P01E01", "Pressure", "X-P01E01I01"]);
    }

    #[test]
    fn recoveries_are_returned() {
        let mut table = Table::new("Route", &["Point", "Equipment", "Equipment ID", "Item", "Item ID"]);
        table.push(["", "", "", "Noise", ""]);
        let annotation = annotate_table(&table, &AllocationCriteria::new("X"));
        assert_eq!(annotation.recoveries.len(), 1);
        assert_eq!(annotation.recoveries[0].row(), 0);
        assert_eq!(annotation.table.rows[0], vec!["X-P01", "", "X-P01E01", "Noise", "X-P01E01I01"]);
    }

    #[test]
    fn second_pass_changes_nothing() {
        let criteria = AllocationCriteria::new("QH1-O");
        let first = annotate_table(&sheet(), &criteria).table;
        let second = annotate_table(&first, &criteria).table;
        assert_eq!(second, first);
    }

    #[test]
    fn workbook_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.xlsx");
        let output = dir.path().join("checkitems.xlsx");
        write_table(&sheet(), &input).unwrap();

        let annotation = annotate_workbook(&input, &output, &AllocationCriteria::new("QH2-O")).unwrap();
        assert_eq!(annotation.point_count, 2);

        let saved = read_table(&output, &Criteria::default()).unwrap();
        assert_eq!(saved.cell(0, 4), "QH2-O-P01E01I01");
        assert_eq!(saved.cell(2, 0), "");
        assert_eq!(saved.cell(4, 2), "QH2-O-P02E01");
        assert_eq!(saved.cell(4, 4), "QH2-O-P02E01I02");
    }

    #[test]
    fn unmatched_sheet_name_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.xlsx");
        write_table(&sheet(), &input).unwrap();
        let criteria = AllocationCriteria::new("Q").with_sheet_name("Summary*").unwrap();
        assert!(annotate_workbook(&input, dir.path().join("out.xlsx"), &criteria).is_err());
    }

    #[test]
    fn invalid_sheet_pattern() {
        assert!(AllocationCriteria::new("Q").with_sheet_name("Route[").is_err());
    }

    #[test]
    fn missing_workbook_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = annotate_workbook(dir.path().join("absent.xlsx"), dir.path().join("out.xlsx"), &AllocationCriteria::new("Q"));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Failed to read workbook"));
    }

    #[test]
    fn error_cell_outside_layout_is_kept() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("errors.xlsx");
        let output = dir.path().join("annotated.xlsx");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&input).unwrap());
        for (name, content) in [
            ("xl/workbook.xml", r#"<workbook><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#),
            ("xl/_rels/workbook.xml.rels", r#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#),
            ("xl/worksheets/sheet1.xml", r#"<worksheet><sheetData>
  <row r="1"><c r="A1" t="inlineStr"><is><t>Point</t></is></c><c r="B1" t="inlineStr"><is><t>Equipment</t></is></c></row>
  <row r="2"><c r="B2" t="inlineStr"><is><t>Pump</t></is></c><c r="D2" t="inlineStr"><is><t>Pressure</t></is></c><c r="G2" t="e"><f>1/0</f><v>#DIV/0!</v></c></row>
</sheetData></worksheet>"#),
        ] {
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();

        let annotation = annotate_workbook(&input, &output, &AllocationCriteria::new("QH2-O")).unwrap();
        assert_eq!(annotation.table.rows[0][4], "QH2-O-P01E01I01");

        let saved = read_table(&output, &Criteria::default()).unwrap();
        assert_eq!(saved.cell(0, 0), "QH2-O-P01");
        assert_eq!(saved.cell(0, 6), "#DIV/0!");

        let strict = AllocationCriteria {
            error_as_text: false,
            ..AllocationCriteria::new("QH2-O")
        };
        assert!(annotate_workbook(&input, &output, &strict).is_err());
    }
}
