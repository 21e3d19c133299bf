//! # Referential integrity of the reference tables
//!
//! Checks the four CSV tables written by [`crate::projection`] against each
//! other: every foreign key must resolve and primary keys must be unique.
//! Nothing here fails; every problem becomes a [`Finding`] in the [`Report`].
use crate::spreadsheet::delimited::read_csv;
use crate::table::Table;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

/// Most values printed per relation in a report.
const REPORT_LIMIT: usize = 20;

/// The four reference tables; `None` when the table could not be loaded.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub points: Option<Table>,
    pub equipments: Option<Table>,
    pub check_items: Option<Table>,
    pub equipment_status: Option<Table>,
}

impl Catalog {
    /// Reads `points.csv`, `equipments.csv`, `check_items.csv` and
    /// `equipment_status.csv` from `dir`. Missing or unreadable files are
    /// returned as findings and leave their table empty.
    pub fn load(dir: impl AsRef<Path>) -> (Self, Vec<Finding>) {
        let dir = dir.as_ref();
        let mut findings = Vec::new();
        let mut load = |name: &str| load_table(dir, name, &mut findings);
        let catalog = Catalog {
            points: load("points"),
            equipments: load("equipments"),
            check_items: load("check_items"),
            equipment_status: load("equipment_status"),
        };
        (catalog, findings)
    }
}

fn load_table(dir: &Path, name: &str, findings: &mut Vec<Finding>) -> Option<Table> {
    let path = dir.join(format!("{name}.csv"));
    if !path.exists() {
        record(findings, Finding::MissingTable { table: name.to_owned(), path });
        return None;
    }
    match read_csv(&path) {
        Ok(table) => {
            log::info!("loaded {}.csv, {} rows", name, table.len());
            Some(table)
        }
        Err(e) => {
            record(findings, Finding::UnreadableTable { table: name.to_owned(), message: e.to_string() });
            None
        }
    }
}

/// One integrity problem.
#[derive(Clone, Debug, PartialEq)]
pub enum Finding {
    MissingTable { table: String, path: PathBuf },
    UnreadableTable { table: String, message: String },
    MissingColumn { table: String, column: String },
    /// A row whose foreign key is empty; `line` is the 1-based file line and
    /// `context` names the row, e.g. `itemName=Vibration`.
    BlankReference { table: String, column: String, line: usize, context: String },
    /// Dangling references or duplicate keys of one relation, unique and in
    /// first-seen order.
    Violation { relation: String, values: Vec<String> },
}

impl Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::MissingTable { table, path } => write!(f, "missing table {}: {}", table, path.display()),
            Finding::UnreadableTable { table, message } => write!(f, "failed to read table {}: {}", table, message),
            Finding::MissingColumn { table, column } => write!(f, "{}.csv lacks column '{}'", table, column),
            Finding::BlankReference { table, column, line, context } => {
                write!(f, "{}.csv line {}: {} is empty ({})", table, line, column, context)
            }
            Finding::Violation { relation, values } => {
                let shown = values.iter().take(REPORT_LIMIT).map(String::as_str).collect::<Vec<_>>();
                write!(f, "{} has {} invalid values: [{}]", relation, values.len(), shown.join(", "))?;
                if values.len() > REPORT_LIMIT {
                    write!(f, " ...")?;
                }
                Ok(())
            }
        }
    }
}

/// All findings of a verification run, in check order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings of one relation, e.g. `check_items.equipmentId`.
    pub fn violation(&self, relation: &str) -> Option<&[String]> {
        self.findings.iter().find_map(|finding| match finding {
            Finding::Violation { relation: name, values } if name == relation => Some(values.as_slice()),
            _ => None,
        })
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "All checks passed (points / equipments / check_items / equipment_status)");
        }
        write!(f, "{} integrity problems found:", self.findings.len())?;
        for finding in &self.findings {
            write!(f, "\n  - {}", finding)?;
        }
        Ok(())
    }
}

/// Loads the catalog in `dir` and runs every check.
pub fn verify_dir(dir: impl AsRef<Path>) -> Report {
    let (catalog, mut findings) = Catalog::load(dir);
    findings.extend(verify(&catalog).findings);
    Report { findings }
}

/// Runs every check against loaded tables. Absent or empty tables skip the
/// checks that need them.
pub fn verify(catalog: &Catalog) -> Report {
    let mut findings = Vec::new();
    let points = present(&catalog.points);
    let equipments = present(&catalog.equipments);
    let check_items = present(&catalog.check_items);
    let equipment_status = present(&catalog.equipment_status);

    if let Some(equipments) = equipments {
        if let Some(refs) = required(equipments, "pointId", &mut findings) {
            blank_references(&mut findings, "equipments", equipments, "pointId", &refs, "equipmentId");
            if let Some(points) = points {
                check_references(&mut findings, "equipments.pointId", refs, points, "pointId");
            }
        }
    }

    if let Some(check_items) = check_items {
        if let Some(refs) = required(check_items, "equipmentId", &mut findings) {
            blank_references(&mut findings, "check_items", check_items, "equipmentId", &refs, "itemName");
            if let Some(equipments) = equipments {
                check_references(&mut findings, "check_items.equipmentId", refs, equipments, "equipmentId");
            }
        }
    }

    if let Some(equipment_status) = equipment_status {
        if let Some(refs) = required(equipment_status, "equipmentId", &mut findings) {
            blank_references(&mut findings, "equipment_status", equipment_status, "equipmentId", &refs, "status");
            if let Some(equipments) = equipments {
                check_references(&mut findings, "equipment_status.equipmentId", refs, equipments, "equipmentId");
            }
        }
    }

    for (name, table, column) in [
        ("points", points, "pointId"),
        ("equipments", equipments, "equipmentId"),
        ("check_items", check_items, "itemId"),
    ] {
        let Some(table) = table else { continue };
        if let Some(keys) = table.column(column) {
            let duplicates = duplicates(keys);
            if !duplicates.is_empty() {
                let relation = format!("{}.duplicate_{}", name, column);
                record(&mut findings, Finding::Violation { relation, values: duplicates });
            }
        }
    }

    Report { findings }
}

fn present(table: &Option<Table>) -> Option<&Table> {
    table.as_ref().filter(|table| !table.is_empty())
}

/// Values of a column the check cannot run without; reports its absence.
fn required<'a>(table: &'a Table, column: &str, findings: &mut Vec<Finding>) -> Option<Vec<&'a str>> {
    match table.column(column) {
        Some(values) => Some(values.collect()),
        None => {
            record(findings, Finding::MissingColumn { table: table.name.to_owned(), column: column.to_owned() });
            None
        }
    }
}

/// Reports every empty foreign key individually; `label` names the column
/// shown to identify the row.
fn blank_references(findings: &mut Vec<Finding>, name: &str, table: &Table, column: &str, refs: &[&str], label: &str) {
    let labels = table.column_index(label);
    for (index, value) in refs.iter().enumerate() {
        if !value.trim().is_empty() {
            continue;
        }
        let context = match labels {
            Some(col) => format!("{}={}", label, table.cell(index, col)),
            None => format!("{}=?", label),
        };
        record(findings, Finding::BlankReference {
            table: name.to_owned(),
            column: column.to_owned(),
            line: index + 2,
            context,
        });
    }
}

/// Unique non-empty references missing from the target column; empty ones
/// are reported by [`blank_references`].
fn check_references(findings: &mut Vec<Finding>, relation: &str, refs: Vec<&str>, target: &Table, column: &str) {
    let Some(keys) = target.column(column) else {
        record(findings, Finding::MissingColumn { table: target.name.to_owned(), column: column.to_owned() });
        return;
    };
    let keys = keys.map(str::trim).collect::<HashSet<_>>();
    let mut seen = HashSet::new();
    let values = refs
        .into_iter()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !keys.contains(value) && seen.insert(*value))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if !values.is_empty() {
        record(findings, Finding::Violation { relation: relation.to_owned(), values });
    }
}

/// Non-empty values occurring more than once, in order of first occurrence.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for value in values.map(str::trim).filter(|value| !value.is_empty()) {
        match positions.get(value) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, _)| value.to_owned())
        .collect()
}

fn record(findings: &mut Vec<Finding>, finding: Finding) {
    log::warn!("{}", finding);
    findings.push(finding);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::delimited::write_csv;

    fn table(name: &str, header: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(name, header);
        for row in rows {
            table.push(row.iter().copied());
        }
        table
    }

    fn catalog() -> Catalog {
        Catalog {
            points: Some(table("points", &["pointId", "routeId"], &[&["R-P01", "R"], &["R-P02", "R"]])),
            equipments: Some(table(
                "equipments",
                &["equipmentId", "equipmentName", "pointId"],
                &[&["R-P01E01", "Pump", "R-P01"], &["R-P02E01", "Fan", "R-P02"]],
            )),
            check_items: Some(table(
                "check_items",
                &["itemId", "itemName", "equipmentId"],
                &[&["R-P01E01I01", "Pressure", "R-P01E01"], &["R-P02E01I01", "Noise", "R-P02E01"]],
            )),
            equipment_status: Some(table(
                "equipment_status",
                &["equipmentId", "status"],
                &[&["R-P01E01", "RUNNING"], &["R-P02E01", "RUNNING"]],
            )),
        }
    }

    #[test]
    fn consistent_catalog_is_clean() {
        let report = verify(&catalog());
        assert!(report.is_clean());
        assert!(report.to_string().starts_with("All checks passed"));
    }

    #[test]
    fn dangling_references() {
        let mut catalog = catalog();
        if let Some(equipments) = catalog.equipments.as_mut() {
            equipments.push(["R-P03E01", "Valve", "R-P03"]);
            equipments.push(["R-P03E02", "Valve", "R-P03"]);
        }
        if let Some(status) = catalog.equipment_status.as_mut() {
            status.push(["R-P09E01", "STOPPED"]);
        }
        if let Some(items) = catalog.check_items.as_mut() {
            items.push(["R-P01E09I01", "Leak", "R-P01E09"]);
        }
        let report = verify(&catalog);
        assert_eq!(report.violation("equipments.pointId"), Some(&["R-P03".to_owned()][..]));
        assert_eq!(report.violation("check_items.equipmentId"), Some(&["R-P01E09".to_owned()][..]));
        assert_eq!(report.violation("equipment_status.equipmentId"), Some(&["R-P09E01".to_owned()][..]));
        assert_eq!(report.findings.len(), 3);
    }

    #[test]
    fn blank_equipment_reported_by_line() {
        let mut catalog = catalog();
        if let Some(items) = catalog.check_items.as_mut() {
            items.push(["R-P02E01I02", "Vibration", " "]);
        }
        let report = verify(&catalog);
        assert_eq!(report.findings, vec![Finding::BlankReference {
            table: "check_items".to_owned(),
            column: "equipmentId".to_owned(),
            line: 4,
            context: "itemName=Vibration".to_owned(),
        }]);
        assert!(report.to_string().contains("check_items.csv line 4: equipmentId is empty (itemName=Vibration)"));
    }

    #[test]
    fn blank_point_and_status_references() {
        let mut catalog = catalog();
        if let Some(equipments) = catalog.equipments.as_mut() {
            equipments.push(["R-P09E01", "Fan", ""]);
        }
        if let Some(status) = catalog.equipment_status.as_mut() {
            status.push(["", "RUNNING"]);
        }
        let report = verify(&catalog);
        assert!(!report.is_clean());
        assert_eq!(report.findings, vec![
            Finding::BlankReference {
                table: "equipments".to_owned(),
                column: "pointId".to_owned(),
                line: 4,
                context: "equipmentId=R-P09E01".to_owned(),
            },
            Finding::BlankReference {
                table: "equipment_status".to_owned(),
                column: "equipmentId".to_owned(),
                line: 4,
                context: "status=RUNNING".to_owned(),
            },
        ]);
    }

    #[test]
    fn blank_point_reported_without_points_table() {
        let catalog = Catalog {
            equipments: Some(table("equipments", &["equipmentId", "equipmentName", "pointId"], &[&["E1", "Pump", " "]])),
            ..Catalog::default()
        };
        let report = verify(&catalog);
        assert!(matches!(&report.findings[..], [Finding::BlankReference { line: 2, .. }]));
    }

    #[test]
    fn duplicate_keys() {
        let mut catalog = catalog();
        if let Some(points) = catalog.points.as_mut() {
            points.push(["R-P02", "R"]);
            points.push(["R-P01", "R"]);
            points.push(["R-P01", "R"]);
        }
        if let Some(items) = catalog.check_items.as_mut() {
            items.push(["R-P01E01I01", "Pressure", "R-P01E01"]);
        }
        let report = verify(&catalog);
        assert_eq!(
            report.violation("points.duplicate_pointId"),
            Some(&["R-P01".to_owned(), "R-P02".to_owned()][..])
        );
        assert_eq!(report.violation("check_items.duplicate_itemId"), Some(&["R-P01E01I01".to_owned()][..]));
        assert_eq!(report.violation("equipments.duplicate_equipmentId"), None);
    }

    #[test]
    fn missing_column_and_absent_tables() {
        let catalog = Catalog {
            equipments: Some(table("equipments", &["equipmentId", "equipmentName"], &[&["E1", "Pump"]])),
            ..Catalog::default()
        };
        let report = verify(&catalog);
        assert_eq!(
            report.findings,
            vec![Finding::MissingColumn { table: "equipments".to_owned(), column: "pointId".to_owned() }]
        );
    }

    #[test]
    fn report_truncates_long_lists() {
        let values = (1..=25).map(|index| format!("E{index}")).collect::<Vec<_>>();
        let report = Report {
            findings: vec![Finding::Violation { relation: "check_items.equipmentId".to_owned(), values }],
        };
        let text = report.to_string();
        assert!(text.contains("check_items.equipmentId has 25 invalid values: [E1, E2,"));
        assert!(text.contains("E20] ..."));
        assert!(!text.contains("E21"));
    }

    #[test]
    fn verify_directory() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        for table in [&catalog.points, &catalog.equipments, &catalog.check_items].into_iter().flatten() {
            write_csv(table, dir.path().join(format!("{}.csv", table.name))).unwrap();
        }
        std::fs::write(dir.path().join("points.csv"), "").unwrap();

        let report = verify_dir(dir.path());
        assert!(matches!(&report.findings[0], Finding::UnreadableTable { table, .. } if table == "points"));
        assert!(matches!(&report.findings[1], Finding::MissingTable { table, .. } if table == "equipment_status"));
        assert_eq!(report.findings.len(), 2);
    }
}
